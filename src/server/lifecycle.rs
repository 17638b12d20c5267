//! Server lifecycle: guarded start, bounded-grace stop, restart.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::server::{create_router, AppContext};

/// Lifecycle states. Exactly one binding is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Stopped,
    Starting,
    Running,
}

#[derive(Debug)]
struct Inner {
    state: ServerState,
    addr: Option<SocketAddr>,
    shutdown: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

/// Owns the listening socket and the serve task.
///
/// `start` while running is ignored (never a second bind); `stop` waits a
/// bounded grace period for in-flight streams, then force-closes. Failing
/// to bind the port is the only error `start` treats as fatal.
pub struct MediaServer {
    ctx: AppContext,
    grace: Duration,
    inner: Mutex<Inner>,
}

impl MediaServer {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            grace: Duration::from_secs(5),
            inner: Mutex::new(Inner {
                state: ServerState::Stopped,
                addr: None,
                shutdown: None,
                task: None,
            }),
        }
    }

    /// Override the stop grace period.
    #[must_use]
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Bind and serve. Returns the bound address (useful with port 0).
    pub async fn start(&self, addr: SocketAddr) -> anyhow::Result<SocketAddr> {
        let mut inner = self.inner.lock().await;
        if inner.state != ServerState::Stopped {
            tracing::warn!(state = ?inner.state, "start requested while already running; ignoring");
            return inner
                .addr
                .ok_or_else(|| anyhow::anyhow!("server starting but not yet bound"));
        }

        inner.state = ServerState::Starting;
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(err) => {
                inner.state = ServerState::Stopped;
                return Err(anyhow::Error::new(err).context(format!("failed to bind {addr}")));
            }
        };
        let bound = listener.local_addr()?;

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let app = create_router(self.ctx.clone());

        let task = tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.changed().await;
            };
            if let Err(err) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                tracing::error!(error = %err, "server task failed");
            }
        });

        inner.addr = Some(bound);
        inner.shutdown = Some(shutdown_tx);
        inner.task = Some(task);
        inner.state = ServerState::Running;
        tracing::info!(addr = %bound, "media server running");
        Ok(bound)
    }

    /// Signal shutdown and wait for in-flight connections, force-closing
    /// whatever outlives the grace period. Idempotent; releases the port.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(shutdown) = inner.shutdown.take() {
            let _ = shutdown.send(true);
        }
        if let Some(mut task) = inner.task.take() {
            if tokio::time::timeout(self.grace, &mut task).await.is_err() {
                tracing::warn!(
                    grace_secs = self.grace.as_secs(),
                    "grace period elapsed; force-closing remaining connections"
                );
                task.abort();
                let _ = task.await;
            }
        }
        inner.addr = None;
        inner.state = ServerState::Stopped;
        tracing::info!("media server stopped");
    }

    /// Stop, then bind again on the requested address.
    pub async fn restart(&self, addr: SocketAddr) -> anyhow::Result<SocketAddr> {
        self.stop().await;
        self.start(addr).await
    }

    pub async fn state(&self) -> ServerState {
        self.inner.lock().await.state
    }

    /// Currently bound address, `None` when stopped.
    pub async fn bound_addr(&self) -> Option<SocketAddr> {
        self.inner.lock().await.addr
    }
}
