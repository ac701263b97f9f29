//! Location header rewriting.
//!
//! A backend that redirects to itself puts its own address into the Location
//! header. Forwarded as is, that leaks the internal host to the client and
//! sends it somewhere it cannot reach. When the Location host is the
//! configured downstream host, the scheme and authority are replaced with the
//! ones the client used.

/// Splits `host[:port]` (or `[v6]:port`) into its host part.
fn host_part(authority: &[u8]) -> &[u8] {
    if authority.starts_with(b"[") {
        return match authority.iter().position(|b| *b == b']') {
            Some(close) => &authority[..=close],
            None => authority,
        };
    }
    match authority.iter().position(|b| *b == b':') {
        Some(colon) => &authority[..colon],
        None => authority,
    }
}

/// Returns true if `match_host` names `host`, either exactly or as `host:port`.
fn host_matches(match_host: &[u8], host: &[u8]) -> bool {
    match match_host.strip_prefix(host) {
        Some(rest) => rest.is_empty() || rest[0] == b':',
        None => false,
    }
}

/// Splits an absolute URI into its scheme and everything after `://`.
fn split_scheme(uri: &[u8]) -> Option<(&[u8], &[u8])> {
    let colon = uri.iter().position(|b| *b == b':')?;
    let scheme = &uri[..colon];
    let valid = scheme.first().is_some_and(u8::is_ascii_alphabetic)
        && scheme.iter().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'));
    if !valid {
        return None;
    }
    uri[colon..].strip_prefix(b"://").map(|rest| (scheme, rest))
}

/// Rewrites `uri` to point at `request_authority` over `client_scheme` if its
/// host is `match_host`.
///
/// Returns `None` when `uri` is not an absolute URI with an authority or its
/// host does not match, in which case the Location must be forwarded
/// unchanged. Path, query and fragment are copied verbatim, with `/` put in
/// place of an empty path. Userinfo in the URI authority is dropped and ports
/// are not compared.
///
/// ```
/// use micro_downstream::downstream::rewrite_location_uri;
///
/// let rewritten = rewrite_location_uri(b"http://localhost2:3000/a?b#c", b"localhost2", b"localhost:8443", b"https");
/// assert_eq!(rewritten.as_deref(), Some(&b"https://localhost:8443/a?b#c"[..]));
///
/// assert_eq!(rewrite_location_uri(b"/relative", b"localhost2", b"localhost:8443", b"https"), None);
/// ```
pub fn rewrite_location_uri(uri: &[u8], match_host: &[u8], request_authority: &[u8], client_scheme: &[u8]) -> Option<Vec<u8>> {
    let (_, rest) = split_scheme(uri)?;

    let authority_end = rest.iter().position(|b| matches!(b, b'/' | b'?' | b'#')).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);

    let host_port = match authority.iter().rposition(|b| *b == b'@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    };
    let host = host_part(host_port);
    if host.is_empty() || !host_matches(match_host, host) {
        return None;
    }

    let mut new_uri = Vec::with_capacity(client_scheme.len() + 3 + request_authority.len() + 1 + tail.len());
    new_uri.extend_from_slice(client_scheme);
    new_uri.extend_from_slice(b"://");
    new_uri.extend_from_slice(request_authority);
    if !tail.starts_with(b"/") {
        new_uri.push(b'/');
    }
    new_uri.extend_from_slice(tail);
    Some(new_uri)
}

/// Returns true if the internal host differs from the host the client asked
/// for, i.e. there is something to hide.
pub(crate) fn needs_rewrite(internal_host: &[u8], request_authority: &[u8]) -> bool {
    !internal_host.is_empty() && !request_authority.is_empty() && internal_host != host_part(request_authority)
}
