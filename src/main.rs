use anyhow::Result;
use pushrelay::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
