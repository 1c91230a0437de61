// Server loop module
// Accepts connections until shutdown is requested, then drains open ones

use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::Instant;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How long open connections may keep running after shutdown is requested
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop until `shutdown` resolves.
///
/// Accept errors are logged and the loop keeps going. Once `shutdown`
/// resolves the listener is closed and in-flight connections get up to
/// [`SHUTDOWN_GRACE_PERIOD`] to finish.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop<S>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: S,
) -> std::io::Result<()>
where
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            _ = &mut shutdown => {
                break;
            }
        }
    }

    drop(listener);
    logger::log_shutdown(state.active_connections.load(Ordering::SeqCst));
    drain_connections(&state, SHUTDOWN_GRACE_PERIOD).await;
    Ok(())
}

/// Wait until no connections are open or `grace` has elapsed
async fn drain_connections(state: &AppState, grace: Duration) {
    let deadline = Instant::now() + grace;
    loop {
        let open = state.active_connections.load(Ordering::SeqCst);
        if open == 0 {
            logger::log_info("All connections closed");
            return;
        }
        if Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Grace period elapsed with {open} connection(s) still open"
            ));
            return;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_reusable_listener;

    fn quiet_state() -> Arc<AppState> {
        let mut config = Config::default();
        config.logging.access_log = false;
        Arc::new(AppState::new(config))
    }

    #[tokio::test]
    async fn test_loop_exits_on_shutdown() {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(start_server_loop(listener, quiet_state(), async {
            let _ = rx.await;
        }));

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_grace() {
        let state = quiet_state();
        state.active_connections.fetch_add(1, Ordering::SeqCst);
        let started = Instant::now();
        drain_connections(&state, Duration::from_millis(100)).await;
        assert!(started.elapsed() >= Duration::from_millis(100));
    }
}
