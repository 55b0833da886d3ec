use anyhow::Result;
use clap::{Parser, Subcommand};

use ggwp_scraper::api;
use ggwp_scraper::config::ScraperConfig;
use ggwp_scraper::pipeline::scrape_site;

#[derive(Parser)]
#[command(name = "ggwp-scraper")]
#[command(about = "Sports-odds page scraper with a trigger API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the trigger API server
    Serve {
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Run one scrape and write the document to the output path
    Scrape {
        /// Override the configured output path; "-" prints to stdout
        #[arg(short, long)]
        out: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let cfg = ScraperConfig::from_env();

    match cli.command {
        Some(Commands::Serve { port }) => {
            tracing::info!("starting scraper API server on port {}", port);
            api::serve(port, cfg).await?;
        }
        Some(Commands::Scrape { out }) => {
            let feed = scrape_site(&cfg).await?;
            let target = out.unwrap_or_else(|| cfg.output_path.clone());
            if target == "-" {
                println!("{}", serde_json::to_string_pretty(&feed)?);
            } else {
                api::persist(&target, &feed).await?;
                tracing::info!("wrote {} matches to {}", feed.matches.len(), target);
            }
        }
        None => {
            tracing::info!("starting scraper API server on port 3000");
            api::serve(3000, cfg).await?;
        }
    }

    Ok(())
}
