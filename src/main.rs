//! Motormart - Main Entry Point

use clap::Parser;
use motormart::cli::{cmd_info, cmd_predict, cmd_serve, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "motormart=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { host, port, paths }) => {
            cmd_serve(host, port, paths).await?;
        }
        Some(Commands::Predict { input, paths }) => {
            cmd_predict(&input, paths)?;
        }
        Some(Commands::Info { paths }) => {
            cmd_info(paths)?;
        }
        None => {
            // Default: serve with environment-derived configuration.
            cmd_serve(None, None, Default::default()).await?;
        }
    }

    Ok(())
}
