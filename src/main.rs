use anyhow::Result;
use clap::Parser;
use finman::cli::{Cli, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.run().await
}
