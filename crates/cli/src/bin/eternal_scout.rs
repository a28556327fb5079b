use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    eternal_cli::main_entry().await
}
