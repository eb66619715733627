use clap::Parser;
use dotenv::dotenv;
use std::error::Error;
use std::io;
use std::sync::Arc;
use tracing::{error, info};

use repo_downloader_lib::{logging, plain, tui, Args, GitHubClient, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // Load .env first so GITHUB_TOKEN can come from it.
    dotenv().ok();

    let args = Args::parse();
    let settings = Settings::from(&args);

    if args.plain {
        logging::init_stderr()?;
    } else {
        logging::init_file(&settings.log_file)?;
    }
    info!(
        api_url = %settings.api_url,
        authenticated = settings.token.is_some(),
        "Configuration resolved"
    );

    let client = match GitHubClient::new(&settings) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Could not create search client: {}", e);
            return Err(e.into());
        }
    };

    if args.plain {
        let query = args.query.unwrap_or_default();
        plain::run(client, &settings, &query, args.download, &mut io::stdout()).await?;
    } else {
        tui::run(client, settings, args.query).await?;
    }

    Ok(())
}
