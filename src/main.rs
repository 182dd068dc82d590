use anyhow::Result;
use formrelay::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
