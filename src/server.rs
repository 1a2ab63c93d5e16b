//! SMSC-side listener.
//!
//! Accepts inbound TCP connections and runs one [`Dispatcher`] per
//! connection on its own task, the way mini-redis's server accepts and
//! spawns per-connection handlers; `new_connection.rs`'s
//! `TcpListener::bind(..).accept()` loop is the concrete precedent inside
//! this codebase for a connection accepted from a listener and driven to
//! completion on its own task.

use crate::connection::Connection;
use crate::dispatcher::{Dispatcher, DispatcherConfig, Handler};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, ToSocketAddrs};

/// Constructs a fresh [`Handler`] for each accepted connection.
///
/// A single `Handler` value can't be shared mutably across sessions if it
/// needs per-connection state, so the listener asks a factory to build one
/// per accept rather than taking a handler instance directly.
pub trait HandlerFactory: Send + Sync + 'static {
    type Handler: Handler;

    fn build(&self) -> Self::Handler;
}

impl<F, H> HandlerFactory for F
where
    F: Fn() -> H + Send + Sync + 'static,
    H: Handler,
{
    type Handler = H;

    fn build(&self) -> H {
        (self)()
    }
}

/// Listens for inbound SMPP connections and dispatches each to its own
/// [`Dispatcher`] task.
pub struct Listener<F: HandlerFactory> {
    listener: TcpListener,
    factory: F,
    config: DispatcherConfig,
    next_session_id: AtomicU64,
}

impl<F: HandlerFactory> Listener<F> {
    pub async fn bind(addr: impl ToSocketAddrs, factory: F, config: DispatcherConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Listener {
            listener,
            factory,
            config,
            next_session_id: AtomicU64::new(1),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until an I/O error occurs, spawning a dispatcher
    /// task per connection. Never returns on its own; drop the listener
    /// (e.g. from another task via cancellation) to stop accepting.
    pub async fn run(self) -> std::io::Result<()> {
        loop {
            let (socket, peer_addr) = self.listener.accept().await?;
            let session_id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
            let handler = self.factory.build();
            let config = self.config.clone();

            tracing::info!(session_id, %peer_addr, "accepted connection");

            tokio::spawn(async move {
                let connection = Connection::new(socket);
                let dispatcher = Dispatcher::new(connection, session_id, handler, config);
                if let Err(e) = dispatcher.run().await {
                    tracing::warn!(session_id, error = %e, "session ended with error");
                } else {
                    tracing::info!(session_id, "session closed");
                }
            });
        }
    }
}

/// Convenience entry point: bind and run a listener with a handler built
/// fresh for each accepted connection.
pub async fn serve<H, B>(
    addr: impl ToSocketAddrs,
    config: DispatcherConfig,
    build_handler: B,
) -> std::io::Result<()>
where
    H: Handler,
    B: Fn() -> H + Send + Sync + 'static,
{
    let listener = Listener::bind(addr, build_handler, config).await?;
    listener.run().await
}

/// Runs `listener` until `shutdown` resolves, then stops accepting new
/// connections. In-flight sessions are left to finish on their own tasks.
pub async fn run_until<F: HandlerFactory>(
    listener: Listener<F>,
    shutdown: impl Future<Output = ()>,
) -> std::io::Result<()> {
    tokio::select! {
        result = listener.run() => result,
        _ = shutdown => {
            tracing::info!("shutdown signal received, no longer accepting connections");
            Ok(())
        }
    }
}
