//! Attestor service binary.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    attestor::server::run().await
}
