/// Returns true if a client speaking HTTP `major.minor` understands interim
/// (1xx) responses.
///
/// HTTP/1.0 has no 1xx responses; HTTP/1.1 and every later major version do.
#[inline]
pub fn supports_non_final(major: u8, minor: u8) -> bool {
    major >= 2 || (major == 1 && minor >= 1)
}
