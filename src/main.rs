#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = shulebook_api::run().await {
        eprintln!("shulebook-api fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
