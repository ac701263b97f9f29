use bytes::Bytes;
use tracing::debug;

use crate::arena::ArenaConfig;
use crate::downstream::connection::BackendConnection;
use crate::downstream::cookie::{self, CookieOutput};
use crate::downstream::location::{needs_rewrite, rewrite_location_uri};
use crate::downstream::{DownstreamRequest, DownstreamResponse, affinity, version};
use crate::error::HeaderError;
use crate::field::{FieldStoreLimits, HeaderField, Token};

/// Sizing shared by the request and response field stores of a [`Downstream`].
///
/// Each half still gets its own arena built from `arena`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownstreamConfig {
    pub arena: ArenaConfig,
    pub limits: FieldStoreLimits,
}

/// Header state of one request as it is forwarded to a backend.
///
/// Created when the frontend starts receiving a request and dropped once the
/// response has been forwarded, which releases both arenas. The frontend
/// parser fills [`request_mut`](Self::request_mut), the backend parser fills
/// [`response_mut`](Self::response_mut), and the forwarding code reads both
/// through the transforms below.
#[derive(Debug)]
pub struct Downstream {
    req: DownstreamRequest,
    resp: DownstreamResponse,
    /// Host the backend is addressed as, hidden from clients by Location rewriting
    request_downstream_host: Bytes,
    affinity_cookie: u32,
    connection: Option<Box<dyn BackendConnection>>,
}

impl Default for Downstream {
    fn default() -> Self {
        Self::new()
    }
}

impl Downstream {
    pub fn new() -> Self {
        Self::with_config(DownstreamConfig::default())
    }

    pub fn with_config(config: DownstreamConfig) -> Self {
        Self {
            req: DownstreamRequest::new(&config),
            resp: DownstreamResponse::new(&config),
            request_downstream_host: Bytes::new(),
            affinity_cookie: 0,
            connection: None,
        }
    }

    pub fn request(&self) -> &DownstreamRequest {
        &self.req
    }

    pub fn request_mut(&mut self) -> &mut DownstreamRequest {
        &mut self.req
    }

    pub fn response(&self) -> &DownstreamResponse {
        &self.resp
    }

    pub fn response_mut(&mut self) -> &mut DownstreamResponse {
        &mut self.resp
    }

    pub fn request_downstream_host(&self) -> &Bytes {
        &self.request_downstream_host
    }

    /// Sets the host the backend is addressed as.
    pub fn set_request_downstream_host(&mut self, host: impl Into<Bytes>) {
        self.request_downstream_host = host.into();
    }

    pub fn connection(&self) -> Option<&dyn BackendConnection> {
        self.connection.as_deref()
    }

    /// Attaches the backend connection the request is forwarded over,
    /// returning the previous one.
    pub fn attach_connection(&mut self, connection: Box<dyn BackendConnection>) -> Option<Box<dyn BackendConnection>> {
        self.connection.replace(connection)
    }

    pub fn detach_connection(&mut self) -> Option<Box<dyn BackendConnection>> {
        self.connection.take()
    }

    /// One `cookie` field per cookie pair of the request, see [`cookie::crumble`].
    pub fn crumble_request_cookie(&self) -> Vec<HeaderField<'_>> {
        cookie::crumble(&self.req.fs)
    }

    /// Number of fields [`crumble_request_cookie`](Self::crumble_request_cookie) returns.
    pub fn count_crumble_request_cookie(&self) -> usize {
        cookie::count_crumbs(&self.req.fs)
    }

    /// The request cookies joined into one header value, see [`cookie::assemble`].
    pub fn assemble_request_cookie(&self) -> Bytes {
        cookie::assemble(&self.req.fs)
    }

    /// Prepares the request cookies for the attached backend connection.
    ///
    /// Crumbs for backends that accept repeated cookie fields, a single
    /// assembled value otherwise or when no connection is attached.
    pub fn prepare_request_cookies(&self) -> CookieOutput<'_> {
        match self.connection() {
            Some(connection) if connection.protocol().crumbles_cookies() => CookieOutput::Crumbs(self.crumble_request_cookie()),
            _ => CookieOutput::Assembled(self.assemble_request_cookie()),
        }
    }

    /// Rewrites a Location response header pointing at the downstream host so
    /// that it points at the authority the client used, over `client_scheme`.
    ///
    /// Does nothing when there is no Location header, no downstream host or
    /// request authority is known, the downstream host is the host the client
    /// asked for, or the Location refers elsewhere.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the response arena is exhausted; the
    /// Location value is left as it was.
    pub fn rewrite_location_response_header(&mut self, client_scheme: &[u8]) -> Result<(), HeaderError> {
        let Some(index) = self.resp.fs.position_by_token(Token::Location) else {
            return Ok(());
        };
        if !needs_rewrite(&self.request_downstream_host, &self.req.authority) {
            return Ok(());
        }

        let Some(location) = self.resp.fs.get(index) else {
            return Ok(());
        };
        let Some(new_uri) = rewrite_location_uri(location.value, &self.request_downstream_host, &self.req.authority, client_scheme) else {
            return Ok(());
        };

        debug!(from = %String::from_utf8_lossy(location.value), to = %String::from_utf8_lossy(&new_uri), "rewrote location header");
        self.resp.fs.set_header_value(index, &new_uri)
    }

    /// Rewrites the Location response header over the scheme of the request,
    /// see [`rewrite_location_response_header`](Self::rewrite_location_response_header).
    ///
    /// Does nothing while that scheme is unknown.
    ///
    /// # Errors
    ///
    /// Same as [`rewrite_location_response_header`](Self::rewrite_location_response_header).
    pub fn rewrite_location_for_request_scheme(&mut self) -> Result<(), HeaderError> {
        if self.req.scheme.is_empty() {
            return Ok(());
        }
        let scheme = self.req.scheme.clone();
        self.rewrite_location_response_header(&scheme)
    }

    /// Returns true if interim responses may be forwarded to this client.
    pub fn supports_non_final_response(&self) -> bool {
        version::supports_non_final(self.req.http_major, self.req.http_minor)
    }

    /// Decodes the affinity cookie `name` of the request and remembers it, see
    /// [`affinity::find_affinity`].
    pub fn find_affinity_cookie(&mut self, name: &[u8]) -> u32 {
        let affinity = affinity::find_affinity(&self.req.fs, name);
        if affinity != 0 {
            self.affinity_cookie = affinity;
        }
        affinity
    }

    /// The last affinity value found by [`find_affinity_cookie`](Self::find_affinity_cookie), 0 if none.
    pub fn affinity_cookie(&self) -> u32 {
        self.affinity_cookie
    }
}
