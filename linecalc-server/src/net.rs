//! UDP service socket: one JSON envelope per datagram, best-effort send.

use std::net::SocketAddr;
use std::sync::Arc;

use linecalc_core::wire::{decode_datagram, encode_datagram, WireError};
use serde_json::Value;
use tokio::net::UdpSocket;
use tracing::warn;

/// One socket per calculator service. Cloning shares the underlying socket,
/// so concurrent tasks can answer while the loop keeps receiving.
#[derive(Clone)]
pub struct ServiceSocket {
    socket: Arc<UdpSocket>,
}

impl ServiceSocket {
    pub async fn bind(ip: &str, port: u16) -> std::io::Result<ServiceSocket> {
        let socket = UdpSocket::bind((ip, port)).await?;
        Ok(ServiceSocket {
            socket: Arc::new(socket),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Wait for one datagram and decode it. The outer error is the socket
    /// failing; the inner one is a malformed payload, which the caller skips
    /// without answering (the sender may not be recoverable from bad bytes).
    pub async fn recv_envelope(
        &self,
        buf: &mut [u8],
    ) -> std::io::Result<Result<(Value, SocketAddr), WireError>> {
        let (n, from) = self.socket.recv_from(buf).await?;
        Ok(decode_datagram(&buf[..n]).map(|envelope| (envelope, from)))
    }

    /// Best-effort send. There is no retry path on a connectionless wire, so
    /// both encode and send failures are logged and swallowed.
    pub async fn send_envelope(&self, envelope: &Value, dest: SocketAddr) {
        match encode_datagram(envelope) {
            Ok(bytes) => {
                if let Err(e) = self.socket.send_to(&bytes, dest).await {
                    warn!(%dest, error = %e, "send failed");
                }
            }
            Err(e) => warn!(%dest, error = %e, "unencodable envelope dropped"),
        }
    }
}
