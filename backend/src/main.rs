#[tokio::main]
async fn main() -> anyhow::Result<()> {
    registration_server::start_server().await
}
