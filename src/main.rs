use anyhow::Result;
use clap::Parser;
use cold_mail::app_log;
use cold_mail::cli::{handle_command, Cli};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    let _ = dotenvy::dotenv();

    // stdout is reserved for command output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cold_mail=info,rocket::server=off")),
        )
        .init();

    let cli = Cli::parse();
    app_log!(debug, "Starting cold-mail");

    handle_command(cli).await
}
