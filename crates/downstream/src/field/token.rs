//! Pre-computed classification of well-known header names.
//!
//! The wire parser classifies a header name once, when the name is complete,
//! so later lookups compare a small enum instead of bytes. Names outside this
//! list carry no token at all (`Option<Token>::None`).

macro_rules! tokens {
    ($(($variant:ident, $name:literal);)+) => {
        /// Known header name classification.
        ///
        /// Names are stored lower-cased, the way HTTP/2 requires on the wire and
        /// the way the HTTP/1 parser normalises them before handing them over.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Token {
            $($variant,)+
        }

        impl Token {
            /// The lower-case header name this token stands for.
            pub const fn as_bytes(self) -> &'static [u8] {
                match self {
                    $(Token::$variant => $name,)+
                }
            }

            /// Classifies an already lower-cased header name.
            ///
            /// The comparison is exact; `Cookie` does not match [`Token::Cookie`].
            pub fn lookup(name: &[u8]) -> Option<Token> {
                match name {
                    $($name => Some(Token::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

tokens! {
    (Authority, b":authority");
    (PseudoHost, b":host");
    (Method, b":method");
    (Path, b":path");
    (Protocol, b":protocol");
    (Scheme, b":scheme");
    (Status, b":status");
    (AcceptEncoding, b"accept-encoding");
    (AcceptLanguage, b"accept-language");
    (AltSvc, b"alt-svc");
    (CacheControl, b"cache-control");
    (Connection, b"connection");
    (ContentLength, b"content-length");
    (ContentType, b"content-type");
    (Cookie, b"cookie");
    (Date, b"date");
    (EarlyData, b"early-data");
    (Expect, b"expect");
    (Forwarded, b"forwarded");
    (Host, b"host");
    (Http2Settings, b"http2-settings");
    (IfModifiedSince, b"if-modified-since");
    (KeepAlive, b"keep-alive");
    (Link, b"link");
    (Location, b"location");
    (Priority, b"priority");
    (ProxyConnection, b"proxy-connection");
    (SecWebsocketAccept, b"sec-websocket-accept");
    (SecWebsocketKey, b"sec-websocket-key");
    (Server, b"server");
    (Te, b"te");
    (Trailer, b"trailer");
    (TransferEncoding, b"transfer-encoding");
    (Upgrade, b"upgrade");
    (UserAgent, b"user-agent");
    (Via, b"via");
    (XForwardedFor, b"x-forwarded-for");
    (XForwardedProto, b"x-forwarded-proto");
}

impl Token {
    /// Returns true for HTTP/2 pseudo header fields such as `:path`.
    pub fn is_pseudo(self) -> bool {
        self.as_bytes().starts_with(b":")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_names() {
        assert_eq!(Token::lookup(b"cookie"), Some(Token::Cookie));
        assert_eq!(Token::lookup(b"content-length"), Some(Token::ContentLength));
        assert_eq!(Token::lookup(b":authority"), Some(Token::Authority));
        assert_eq!(Token::lookup(b"location"), Some(Token::Location));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(Token::lookup(b"Cookie"), None);
        assert_eq!(Token::lookup(b"x-unknown"), None);
        assert_eq!(Token::lookup(b""), None);
    }

    #[test]
    fn names_round_trip() {
        for token in [Token::Authority, Token::PseudoHost, Token::Host, Token::Te, Token::XForwardedProto] {
            assert_eq!(Token::lookup(token.as_bytes()), Some(token));
        }
    }

    #[test]
    fn pseudo_headers() {
        assert!(Token::Method.is_pseudo());
        assert!(Token::Status.is_pseudo());
        assert!(!Token::Cookie.is_pseudo());
    }
}
