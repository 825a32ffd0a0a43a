use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    traceview_cli::cli::app::run().await
}
