//! Connection lifecycle callbacks.

use std::{net::SocketAddr, sync::Arc};

use super::CloseReason;

/// Handler invoked once the transport is attached, before any frame is read.
///
/// Receives the peer address when the transport has one.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use streamframe::connection::ConnectHandler;
///
/// let hook: ConnectHandler = Arc::new(|peer| tracing::info!(?peer, "channel active"));
/// # hook(None);
/// ```
pub type ConnectHandler = Arc<dyn Fn(Option<SocketAddr>) + Send + Sync>;

/// Handler invoked exactly once when the reader stops.
pub type DisconnectHandler = Arc<dyn Fn(&CloseReason) + Send + Sync>;

#[derive(Clone, Default)]
pub(super) struct LifecycleHooks {
    pub(super) on_connect: Option<ConnectHandler>,
    pub(super) on_disconnect: Option<DisconnectHandler>,
}
