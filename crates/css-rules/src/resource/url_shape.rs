//! Recognises references to remote network hosts.
//!
//! The accepted shape is
//!
//! ```text
//! external := scheme "://" [userinfo "@"] host [":" port] [tail]
//! scheme   := "ftp" | "http" | "https"            (ASCII case-insensitive)
//! userinfo := word+ [":" word*]                    (word = ASCII alnum or "_")
//! host     := "[" ipv6 "]" | 1*(non-whitespace except / ? # @ : [ ])
//! port     := 1*DIGIT
//! tail     := ("/" | "?" | "#") *(non-whitespace)
//! ```

/// Schemes that point at a network host.
const NETWORK_SCHEMES: &[&str] = &["ftp", "http", "https"];

/// The components of an external URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalUrl<'a> {
    /// `http`, `https` or `ftp`, as written.
    pub scheme: &'a str,
    /// `user` or `user:password`, without the `@`.
    pub userinfo: Option<&'a str>,
    /// Host name, address or bracketed IPv6 literal.
    pub host: &'a str,
    /// Port digits, without the `:`.
    pub port: Option<&'a str>,
    /// Path, query and fragment; empty or starting with `/`, `?` or `#`.
    pub tail: &'a str,
}

/// Splits `path` into its external URL components, or returns `None` if it
/// does not point at a network host.
pub fn parse_external_url(path: &str) -> Option<ExternalUrl<'_>> {
    let (scheme, rest) = path.split_once("://")?;
    if !NETWORK_SCHEMES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(scheme))
    {
        return None;
    }

    let (userinfo, rest) = split_userinfo(rest);
    let (host, rest) = split_host(rest)?;
    let (port, tail) = split_port(rest)?;

    if !(tail.is_empty() || tail.starts_with(['/', '?', '#'])) {
        return None;
    }
    if tail.chars().any(char::is_whitespace) {
        return None;
    }

    Some(ExternalUrl {
        scheme,
        userinfo,
        host,
        port,
        tail,
    })
}

/// Returns true if `path` points at a network host.
pub fn is_external(path: &str) -> bool {
    parse_external_url(path).is_some()
}

/// Returns the URI scheme of `path`, if it has one.
///
/// Single-letter "schemes" are treated as Windows drive letters, not schemes.
pub fn uri_scheme(path: &str) -> Option<&str> {
    let (scheme, _) = path.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if scheme.len() < 2 || !first.is_ascii_alphabetic() {
        return None;
    }
    chars
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        .then_some(scheme)
}

fn is_word(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn split_userinfo(rest: &str) -> (Option<&str>, &str) {
    let Some((candidate, after)) = rest.split_once('@') else {
        return (None, rest);
    };
    let (user, password) = match candidate.split_once(':') {
        Some((user, password)) => (user, Some(password)),
        None => (candidate, None),
    };
    if !user.is_empty() && is_word(user) && password.map_or(true, is_word) {
        (Some(candidate), after)
    } else {
        (None, rest)
    }
}

fn split_host(rest: &str) -> Option<(&str, &str)> {
    if rest.starts_with('[') {
        let close = rest.find(']')?;
        if close == 1 {
            return None;
        }
        return Some(rest.split_at(close + 1));
    }

    let end = rest
        .find(|c: char| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@' | ':' | '[' | ']'))
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    Some(rest.split_at(end))
}

fn split_port(rest: &str) -> Option<(Option<&str>, &str)> {
    let Some(after) = rest.strip_prefix(':') else {
        return Some((None, rest));
    };
    let digits = after
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after.len());
    if digits == 0 {
        return None;
    }
    let (port, tail) = after.split_at(digits);
    Some((Some(port), tail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_url() {
        assert_eq!(
            parse_external_url("https://user:pw@cdn.example.com:8080/a/b.png?v=1#x"),
            Some(ExternalUrl {
                scheme: "https",
                userinfo: Some("user:pw"),
                host: "cdn.example.com",
                port: Some("8080"),
                tail: "/a/b.png?v=1#x",
            })
        );
    }

    #[test]
    fn test_bare_host() {
        let url = parse_external_url("http://example.com").unwrap();
        assert_eq!(url.host, "example.com");
        assert_eq!(url.tail, "");
        assert_eq!(url.port, None);
    }

    #[test]
    fn test_network_schemes() {
        assert!(is_external("ftp://files.example.com/font.woff"));
        assert!(is_external("http://www.external.com/resource/resource.ext"));
        assert!(is_external("HTTPS://EXAMPLE.COM/"));
        assert!(!is_external("gopher://example.com/"));
        assert!(!is_external("file:///etc/passwd"));
    }

    #[test]
    fn test_scheme_without_host() {
        assert!(!is_external("http://"));
        assert!(!is_external("https:///path"));
        assert!(!is_external("http://:80/"));
    }

    #[test]
    fn test_port_must_be_digits() {
        assert!(is_external("http://localhost:3000/x.css"));
        assert!(!is_external("http://localhost:abc/x.css"));
    }

    #[test]
    fn test_ipv6_host() {
        let url = parse_external_url("http://[::1]:8080/x").unwrap();
        assert_eq!(url.host, "[::1]");
        assert_eq!(url.port, Some("8080"));
        assert!(!is_external("http://[]/x"));
    }

    #[test]
    fn test_query_directly_after_host() {
        assert!(is_external("http://example.com?x=1"));
    }

    #[test]
    fn test_whitespace_is_rejected() {
        assert!(!is_external("http://exa mple.com/"));
        assert!(!is_external("http://example.com/a b.png"));
    }

    #[test]
    fn test_not_external() {
        assert!(!is_external("../resource/resource.ext"));
        assert!(!is_external("//cdn.example.com/a.css"));
        assert!(!is_external("data:font/opentype;base64,AAAA"));
        assert!(!is_external("assets/http://x"));
    }

    #[test]
    fn test_uri_scheme() {
        assert_eq!(uri_scheme("data:image/png;base64,AA"), Some("data"));
        assert_eq!(uri_scheme("blob:https://x/1"), Some("blob"));
        assert_eq!(uri_scheme("C:\\fonts\\a.ttf"), None);
        assert_eq!(uri_scheme("img/a.png"), None);
        assert_eq!(uri_scheme("a/b:c"), None);
    }
}
