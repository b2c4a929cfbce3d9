use clap::Parser;
use icat_admin::{service_management, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    service_management::start(&cli)?;
    icat_admin::execute(&cli).await
}
