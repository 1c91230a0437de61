use std::sync::Arc;

use vidserve::config::{AppState, Config};
use vidserve::handler::video;
use vidserve::logger;
use vidserve::server::{self, SignalHandler};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // Tokio runtime; thread count follows `server.workers` when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    video::log_video_dir_contents(&cfg.content.video_dir).await;

    let listener = server::create_reusable_listener(addr).inspect_err(|e| {
        logger::log_bind_failed(&addr, e);
    })?;

    logger::log_server_start(&addr, &cfg);

    let signals = Arc::new(SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    let state = Arc::new(AppState::new(cfg));
    server::start_server_loop(listener, state, async move { signals.wait().await }).await?;
    Ok(())
}
