//! Request-part extractors: connection peer address and request origin.

pub mod origin;
pub mod peer;
pub use origin::RequestOrigin;
pub use peer::PeerAddr;
