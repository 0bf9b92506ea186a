#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bannerflow::logging::init();
    bannerflow::app::run().await
}
