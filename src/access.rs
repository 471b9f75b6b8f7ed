//! IP allow-list gate for mutating operations.
//!
//! Matching is exact string equality between the peer IP (no port) and an
//! allow-list entry. There is no CIDR or prefix support, and `::ffff:127.0.0.1`
//! does not match `127.0.0.1`.

use crate::error::AppError;
use crate::extractors::PeerAddr;
use std::future::Future;

#[derive(Clone, Debug, Default)]
pub struct AllowList {
    entries: Vec<String>,
}

impl AllowList {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AllowList {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, client_ip: &str) -> bool {
        self.entries.iter().any(|ip| ip == client_ip)
    }

    /// Admit or refuse the peer.
    pub fn admit(&self, peer: PeerAddr) -> Result<(), AppError> {
        let Some(addr) = peer.0 else {
            tracing::error!("client address unavailable on connection");
            return Err(AppError::BadRequest("invalid address".into()));
        };
        let client_ip = addr.ip().to_string();
        if !self.contains(&client_ip) {
            tracing::warn!(client_ip = %client_ip, "mutating request denied by IP allow-list");
            return Err(AppError::Forbidden("access denied".into()));
        }
        Ok(())
    }

    /// Run `op` only when the peer is admitted. `op` is never polled otherwise.
    pub async fn guard<F, T>(&self, peer: PeerAddr, op: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        self.admit(peer)?;
        op.await
    }
}
