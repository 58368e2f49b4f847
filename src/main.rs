#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tf_lcm_api::run_server().await
}
