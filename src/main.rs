#[tokio::main]
async fn main() {
    slotland::app::bootstrap::run().await;
}
