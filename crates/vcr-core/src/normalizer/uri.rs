//! URI normalizer — explicit-port canonical URIs
//!
//! `http://host/path` and `http://host:80/path` name the same resource, so
//! both canonicalize to the explicit-port form. The canonical serializer
//! always renders a port when one is known, including the scheme default
//! that a standard URL serializer leaves out.
//!
//! Only strict RFC 3986 absolute URIs are normalized. Anything else is
//! returned unchanged. Normalization splices the port into the text as
//! written; apart from a lower-cased scheme no other byte changes.

use log::{debug, trace};
use url::Url;

/// Default ports filled in when a URI carries none
///
/// Schemes outside this table are left without a port.
pub const DEFAULT_PORTS: &[(&str, u16)] = &[("http", 80), ("https", 443)];

/// Look up the default port for a scheme in [`DEFAULT_PORTS`]
pub fn default_port(scheme: &str) -> Option<u16> {
    DEFAULT_PORTS
        .iter()
        .find(|(name, _)| scheme.eq_ignore_ascii_case(name))
        .map(|&(_, port)| port)
}

/// Normalize a URI string to canonical form
///
/// # Guarantees
/// - `http`/`https` URIs with a host always carry an explicit port
/// - Input that is not an RFC 3986 absolute URI is returned byte-for-byte
/// - An explicitly written port is never dropped
/// - Idempotent: `normalize_uri(&normalize_uri(x)) == normalize_uri(x)`
pub fn normalize_uri(raw: &str) -> String {
    let Some(components) = parse_components(raw) else {
        debug!("leaving URI {:?} as given: not an RFC 3986 absolute URI", raw);
        return raw.to_string();
    };

    // Syntax alone accepts bad IP literals and out-of-range ports.
    if let Err(err) = Url::parse(raw) {
        debug!("leaving URI {:?} as given: {}", raw, err);
        return raw.to_string();
    }

    let scheme = components.scheme.to_ascii_lowercase();
    let after_scheme = &raw[components.scheme.len()..];

    let authority = match components.authority {
        Some(authority) if !authority.host.is_empty() => authority,
        _ => return format!("{}{}", scheme, after_scheme),
    };

    // An empty port (`host:`) counts as no port.
    let (port, tail_start) = match authority.port {
        Some(port) if !port.is_empty() => return format!("{}{}", scheme, after_scheme),
        Some(_) => (default_port(&scheme), authority.host_end + 1),
        None => (default_port(&scheme), authority.host_end),
    };

    match port {
        Some(port) => {
            trace!("injecting default port {} for {}", port, scheme);
            format!(
                "{}{}:{}{}",
                scheme,
                &raw[components.scheme.len()..authority.host_end],
                port,
                &raw[tail_start..]
            )
        }
        None => format!("{}{}", scheme, after_scheme),
    }
}

// ── RFC 3986 syntax ────────────────────────────────────────

struct Components<'a> {
    scheme: &'a str,
    authority: Option<Authority<'a>>,
}

struct Authority<'a> {
    host: &'a str,
    /// Text after the host's `:`, if the colon is present
    port: Option<&'a str>,
    /// Byte offset in the raw string where the host ends
    host_end: usize,
}

/// Split an absolute URI (`scheme ":" hier-part [ "?" query ] [ "#" fragment ]`)
///
/// Returns `None` for anything the RFC 3986 grammar rejects, including
/// whitespace, backslashes, non-ASCII bytes and bad percent-escapes.
fn parse_components(raw: &str) -> Option<Components<'_>> {
    let colon = raw.find(':')?;
    let scheme = &raw[..colon];
    if !is_scheme(scheme) {
        return None;
    }

    let rest = &raw[colon + 1..];
    let (before_fragment, fragment) = split_at_byte(rest, b'#');
    let (hier, query) = split_at_byte(before_fragment, b'?');
    if !query.map_or(true, |q| is_valid(q, is_query_char))
        || !fragment.map_or(true, |f| is_valid(f, is_query_char))
    {
        return None;
    }

    let authority = match hier.strip_prefix("//") {
        Some(after) => {
            let end = after.find('/').unwrap_or(after.len());
            let (authority, path) = after.split_at(end);
            if !is_valid(path, is_path_char) {
                return None;
            }
            Some(parse_authority(authority, colon + 3)?)
        }
        None => {
            if !is_valid(hier, is_path_char) {
                return None;
            }
            None
        }
    };

    Some(Components { scheme, authority })
}

/// `[ userinfo "@" ] host [ ":" port ]`, starting at `offset` in the raw string
fn parse_authority(authority: &str, offset: usize) -> Option<Authority<'_>> {
    let (userinfo_len, hostport) = match authority.find('@') {
        Some(at) => {
            if !is_valid(&authority[..at], is_userinfo_char) {
                return None;
            }
            (at + 1, &authority[at + 1..])
        }
        None => (0, authority),
    };

    let (host, port) = if hostport.starts_with('[') {
        let close = hostport.find(']')?;
        let literal = &hostport[1..close];
        if literal.is_empty() || !literal.bytes().all(is_ip_literal_char) {
            return None;
        }
        let after = &hostport[close + 1..];
        let port = if after.is_empty() {
            None
        } else {
            Some(after.strip_prefix(':')?)
        };
        (&hostport[..=close], port)
    } else {
        let (host, port) = match hostport.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (hostport, None),
        };
        if !is_valid(host, is_reg_name_char) {
            return None;
        }
        (host, port)
    };

    if !port.map_or(true, |p| p.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }

    Some(Authority {
        host,
        port,
        host_end: offset + userinfo_len + host.len(),
    })
}

fn split_at_byte(s: &str, byte: u8) -> (&str, Option<&str>) {
    match s.bytes().position(|b| b == byte) {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    }
}

fn is_scheme(s: &str) -> bool {
    let mut bytes = s.bytes();
    bytes.next().is_some_and(|b| b.is_ascii_alphabetic())
        && bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
}

/// Every byte is `allowed` or part of a `%XX` escape
fn is_valid(s: &str, allowed: fn(u8) -> bool) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len()
                || !bytes[i + 1].is_ascii_hexdigit()
                || !bytes[i + 2].is_ascii_hexdigit()
            {
                return false;
            }
            i += 3;
        } else if allowed(bytes[i]) {
            i += 1;
        } else {
            return false;
        }
    }
    true
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

fn is_sub_delim(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'='
    )
}

fn is_pchar(b: u8) -> bool {
    is_unreserved(b) || is_sub_delim(b) || matches!(b, b':' | b'@')
}

fn is_path_char(b: u8) -> bool {
    is_pchar(b) || b == b'/'
}

fn is_query_char(b: u8) -> bool {
    is_pchar(b) || matches!(b, b'/' | b'?')
}

fn is_userinfo_char(b: u8) -> bool {
    is_unreserved(b) || is_sub_delim(b) || b == b':'
}

fn is_reg_name_char(b: u8) -> bool {
    is_unreserved(b) || is_sub_delim(b)
}

fn is_ip_literal_char(b: u8) -> bool {
    is_unreserved(b) || is_sub_delim(b) || b == b':'
}
