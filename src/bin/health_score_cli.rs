use clap::Parser;
use health_score::client::cli_client::{self, CliArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli_client::run(CliArgs::parse()).await
}
