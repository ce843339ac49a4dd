use std::net::SocketAddr;
use std::sync::Arc;

use storycrafter::{web, Config, OpenAiCompletions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stackdriver_logger::init_with_cargo!("../../Cargo.toml");

    log::info!("Starting Storyteller");
    let config = Config::from_env()?;
    log::debug!("Config: {:?}", config);

    let completions = Arc::new(OpenAiCompletions::new(&config.credentials));
    let router = web::router(completions);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log::info!("Listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}
