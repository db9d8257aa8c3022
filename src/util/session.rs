//! Session cookies carrying the access and refresh JWTs.

use axum::http::{header, HeaderMap, HeaderValue};

pub const ACCESS_COOKIE: &str = "session";
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Value of the named cookie in the request's `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for an HTTP-only session cookie.
pub fn session_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        name, value, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn expired_cookie(name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", name)
}

pub fn append_set_cookie(headers: &mut HeaderMap, cookie: &str) {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        headers.append(header::SET_COOKIE, value);
    }
}

/// Bearer token from `Authorization`, else the access cookie.
pub fn access_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| read_cookie(headers, ACCESS_COOKIE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_read_cookie_across_headers() {
        let map = headers(&[
            (header::COOKIE, "theme=dark; session=abc.def"),
            (header::COOKIE, "refresh_token=xyz"),
        ]);
        assert_eq!(read_cookie(&map, ACCESS_COOKIE).as_deref(), Some("abc.def"));
        assert_eq!(read_cookie(&map, REFRESH_COOKIE).as_deref(), Some("xyz"));
        assert_eq!(read_cookie(&map, "missing"), None);
    }

    #[test]
    fn test_empty_cookie_is_absent() {
        let map = headers(&[(header::COOKIE, "session=")]);
        assert_eq!(read_cookie(&map, ACCESS_COOKIE), None);
    }

    #[test]
    fn test_bearer_wins_over_cookie() {
        let map = headers(&[
            (header::AUTHORIZATION, "Bearer from-header"),
            (header::COOKIE, "session=from-cookie"),
        ]);
        assert_eq!(access_token(&map).as_deref(), Some("from-header"));
        let map = headers(&[(header::COOKIE, "session=from-cookie")]);
        assert_eq!(access_token(&map).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie(ACCESS_COOKIE, "tok", 3600, true);
        assert_eq!(cookie, "session=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600; Secure");
        assert!(expired_cookie(REFRESH_COOKIE).contains("Max-Age=0"));
    }
}
