#[tokio::main]
async fn main() -> anyhow::Result<()> {
    guess_game_server::run_server().await
}
