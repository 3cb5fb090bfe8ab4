//! Ephemeral TCP port allocation

use async_net::TcpListener;
use tracing::debug;

use crate::Result;

/// Allocate a TCP port that was unused at the instant of the call.
///
/// Binds a transient listener to port 0 so the OS assigns a port from its
/// ephemeral range, then releases the listener before returning. No
/// reservation is held afterwards, so another process may claim the port
/// before the caller binds it; callers that need a guarantee must bind the
/// listener themselves and pass it along.
pub async fn get_free_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    debug!("allocated free port {}", port);
    Ok(port)
}
