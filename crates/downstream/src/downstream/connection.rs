use std::fmt::Debug;

/// Wire protocol spoken by a backend connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendProtocol {
    Http1,
    Http2,
}

impl BackendProtocol {
    /// Returns true if the protocol allows one `cookie` field per cookie pair.
    ///
    /// HTTP/2 compresses repeated fields well, so cookies are crumbled for it.
    /// HTTP/1 backends expect a single joined `cookie` header.
    #[inline]
    pub fn crumbles_cookies(self) -> bool {
        matches!(self, BackendProtocol::Http2)
    }
}

/// The backend connection a [`Downstream`](crate::downstream::Downstream) is
/// forwarded over.
///
/// The header core only needs to know what the connection speaks. Dialing,
/// pooling and I/O belong to the implementor.
pub trait BackendConnection: Debug + Send {
    fn protocol(&self) -> BackendProtocol;
}
