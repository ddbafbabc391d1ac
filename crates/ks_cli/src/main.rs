use chrono::NaiveDate;
use clap::Parser;
use ks_chart::{render_to_file, ChartOptions};
use ks_core::types::cutoff_date;
use ks_core::{compute_sentiment_series, ArticleSource, City, Result, SeriesRequest};
use ks_storage::create_source;
use ks_web::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};

mod args;
mod report;

use args::SourceArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Keyword sentiment index for regional news", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    source: SourceArgs,
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Compute the monthly sentiment index for a keyword in one city and chart it
    Report {
        /// City name in Hangul (동두천) or romanized (dongducheon)
        #[arg(long, default_value = "동두천")]
        city: City,
        /// Literal, case-sensitive substring to look for in article content
        #[arg(long, default_value = "미군")]
        keyword: String,
        /// Earliest article date to include (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,
        /// Where to write the SVG chart
        #[arg(short, long, default_value = "sentiment_index.svg")]
        output: PathBuf,
        /// Print the series as JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Skip writing the chart
        #[arg(long)]
        no_chart: bool,
    },
    /// Serve the interactive keyword/city form over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
        /// Earliest article date to include (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,
    },
    /// List the cities that can be analysed
    Cities,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn connect(args: SourceArgs) -> Result<Arc<dyn ArticleSource>> {
    let config = args.into_config()?;
    let source = create_source(&config).await?;

    info!("💾 Checking {} connection...", source.name());
    source.ping().await?;
    info!("✨ Article source ready (using {})", source.name());
    Ok(source)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Cities => {
            for city in City::ALL {
                println!("{}\t{}", city.name(), city.slug());
            }
        }
        Commands::Report {
            city,
            keyword,
            since,
            output,
            json,
            no_chart,
        } => {
            let source = connect(cli.source).await?;
            let request = SeriesRequest::new(city, keyword).since(since.unwrap_or_else(cutoff_date));
            let series = compute_sentiment_series(source.as_ref(), &request).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&series)?);
            } else {
                print!("{}", report::format_table(&series));
            }
            if !no_chart {
                render_to_file(&series, &ChartOptions::default(), &output)?;
            }
        }
        Commands::Serve { addr, since } => {
            let source = connect(cli.source).await?;
            let state = AppState::new(source).with_since(since.unwrap_or_else(cutoff_date));
            ks_web::serve(state, addr).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_defaults() {
        let cli = Cli::try_parse_from(["kwsent", "report"]).unwrap();
        match cli.command {
            Commands::Report {
                city,
                keyword,
                since,
                output,
                json,
                no_chart,
            } => {
                assert_eq!(city, City::Dongducheon);
                assert_eq!(keyword, "미군");
                assert_eq!(since, None);
                assert_eq!(output, PathBuf::from("sentiment_index.svg"));
                assert!(!json && !no_chart);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_report_arguments() {
        let cli = Cli::try_parse_from([
            "kwsent",
            "report",
            "--city",
            "paju",
            "--keyword",
            "반환",
            "--since",
            "2021-06-01",
            "--sqlite",
            "mirror.db",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.source.sqlite, Some(PathBuf::from("mirror.db")));
        match cli.command {
            Commands::Report { city, since, json, .. } => {
                assert_eq!(city, City::Paju);
                assert_eq!(since, NaiveDate::from_ymd_opt(2021, 6, 1));
                assert!(json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_city_is_rejected() {
        assert!(Cli::try_parse_from(["kwsent", "report", "--city", "서울"]).is_err());
    }

    #[tokio::test]
    async fn test_report_against_sqlite_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("mirror.db");
        let mirror = ks_storage::SqliteSource::new_with_path(&db_path).await.unwrap();
        for (date, sentiment, content) in [
            ("2020-01-05", "1", "미군 기지"),
            ("2020-02-05", "-1", "미군 소음"),
            ("2020-03-05", "1", "도서관 개관"),
        ] {
            mirror
                .insert_record(&ks_storage::SentimentRecord::new(date, sentiment, Some(content), "동두천"))
                .await
                .unwrap();
        }

        let args = SourceArgs {
            sqlite: Some(db_path),
            ..SourceArgs::default()
        };
        let source = connect(args).await.unwrap();
        let request = SeriesRequest::new(City::Dongducheon, "미군");
        let series = compute_sentiment_series(source.as_ref(), &request).await.unwrap();

        let indices: Vec<Option<f64>> = series.points.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![Some(1.0), Some(0.0), Some(0.0)]);

        let chart = dir.path().join("chart.svg");
        render_to_file(&series, &ChartOptions::default(), &chart).unwrap();
        assert!(chart.exists());
    }
}
