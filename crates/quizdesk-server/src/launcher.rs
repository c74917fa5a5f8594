//! Start the delivery front and, optionally, expose it publicly.
//!
//! The listener is bound before anything else happens: once [`launch`]
//! returns, the server accepts connections. Exposure runs afterwards and
//! can only ever add a public URL; when it fails the server stays up in
//! local-only mode.

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;

use quizdesk_core::session::SessionService;

/// Errors from starting the server.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start server: {0}")]
    Start(#[source] std::io::Error),
}

/// Errors from an exposure provider. Never fatal.
#[derive(Debug, Error)]
pub enum ExposureError {
    #[error("{provider} is not configured: {reason}")]
    NotConfigured { provider: String, reason: String },

    #[error("{provider} failed: {reason}")]
    Failed { provider: String, reason: String },
}

/// Something that can make a local address reachable from outside.
#[async_trait]
pub trait Exposure: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Return a public URL for `local_addr`, or `None` to stay local.
    async fn expose(&self, local_addr: SocketAddr) -> Result<Option<String>, ExposureError>;

    /// Release whatever `expose` acquired.
    async fn close(&self) {}
}

/// Serves on the local network only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOnly;

#[async_trait]
impl Exposure for LocalOnly {
    fn name(&self) -> &str {
        "local"
    }

    async fn expose(&self, _local_addr: SocketAddr) -> Result<Option<String>, ExposureError> {
        Ok(None)
    }
}

/// A running delivery front.
pub struct ServerHandle {
    local_addr: SocketAddr,
    public_url: Option<String>,
    server: actix_web::dev::ServerHandle,
    task: JoinHandle<std::io::Result<()>>,
    exposure: Arc<dyn Exposure>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn local_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    pub fn public_url(&self) -> Option<&str> {
        self.public_url.as_deref()
    }

    /// The URL students should be given.
    pub fn share_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| self.local_url())
    }

    /// Stop accepting connections, let in-flight requests finish, and
    /// release the exposure.
    pub async fn stop(self) {
        tracing::info!("stopping server on {}", self.local_addr);
        self.exposure.close().await;
        self.server.stop(true).await;
        match self.task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("server exited with error: {e}"),
            Err(e) => tracing::warn!("server task failed: {e}"),
        }
    }
}

/// Bind `address`, start serving, then try to expose it.
///
/// Must be called from within a Tokio runtime.
pub async fn launch(
    address: &str,
    service: Arc<SessionService>,
    exposure: Arc<dyn Exposure>,
) -> Result<ServerHandle, LaunchError> {
    let listener = TcpListener::bind(address).map_err(|source| LaunchError::Bind {
        address: address.to_string(),
        source,
    })?;
    let local_addr = listener.local_addr().map_err(LaunchError::Start)?;

    let server = crate::run(listener, service).map_err(LaunchError::Start)?;
    let handle = server.handle();
    let task = tokio::spawn(server);
    tracing::info!("serving on http://{local_addr}");

    let public_url = match exposure.expose(local_addr).await {
        Ok(Some(url)) => {
            tracing::info!("public URL via {}: {url}", exposure.name());
            Some(url)
        }
        Ok(None) => {
            tracing::info!("running in local-only mode");
            None
        }
        Err(e) => {
            tracing::warn!("exposure failed, running in local-only mode: {e}");
            None
        }
    };

    Ok(ServerHandle {
        local_addr,
        public_url,
        server: handle,
        task,
        exposure,
    })
}
