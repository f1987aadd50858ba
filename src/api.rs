// API client module: a small blocking HTTP client used to check whether a
// stored `.ROBLOSECURITY` cookie still signs in. Every failure mode (bad
// cookie, network error, timeout, non-200 status) collapses to `false`.

use crate::config::Config;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Path of the "who am I" endpoint on the users API.
const AUTHENTICATED_PATH: &str = "/v1/users/authenticated";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Banner Roblox puts at the start of every genuine session cookie.
pub const ROBLOSECURITY_BANNER: &str = "_|WARNING:-DO-NOT-SHARE-THIS.--Sharing-this-will-allow-someone-to-log-in-as-you-and-to-steal-your-ROBUX-and-items.|_";

/// Something that can tell whether a cookie is still accepted.
pub trait CookieValidator {
    fn validate(&self, cookie: &str) -> bool;
}

/// Holds a reqwest blocking client and the base URL of the users API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from the configured base URL and timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, config.timeout)
    }

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Headers for an authenticated request, or `None` when the cookie
    /// cannot be sent as a header value.
    fn cookie_headers(cookie: &str) -> Option<HeaderMap> {
        let value = HeaderValue::from_str(&format!(".ROBLOSECURITY={cookie}")).ok()?;
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, value);
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        Some(headers)
    }
}

impl CookieValidator for ApiClient {
    fn validate(&self, cookie: &str) -> bool {
        let cookie = cookie.trim();
        if cookie.is_empty() {
            return false;
        }
        let Some(headers) = Self::cookie_headers(cookie) else {
            debug!("cookie contains characters not allowed in a header");
            return false;
        };

        let url = format!("{}{}", self.base_url, AUTHENTICATED_PATH);
        match self.client.get(&url).headers(headers).send() {
            Ok(res) => {
                debug!(status = %res.status(), "validation response");
                res.status() == StatusCode::OK
            }
            Err(e) => {
                debug!(error = %e, timeout = e.is_timeout(), "validation request failed");
                false
            }
        }
    }
}

/// Whether `cookie` starts with the warning banner real session cookies
/// carry. Used to double check before saving something that looks off.
pub fn looks_like_roblosecurity(cookie: &str) -> bool {
    cookie.starts_with(ROBLOSECURITY_BANNER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_detection() {
        assert!(looks_like_roblosecurity(&format!("{ROBLOSECURITY_BANNER}ABCDEF")));
        assert!(!looks_like_roblosecurity("ABCDEF"));
        assert!(!looks_like_roblosecurity(""));
    }

    #[test]
    fn header_rejects_control_characters() {
        assert!(ApiClient::cookie_headers("abc\r\nX-Injected: 1").is_none());
        let headers = ApiClient::cookie_headers("abc").unwrap();
        assert_eq!(headers[COOKIE], ".ROBLOSECURITY=abc");
        assert_eq!(headers[USER_AGENT], BROWSER_USER_AGENT);
    }

    #[test]
    fn empty_cookie_is_invalid_without_a_request() {
        // Port 9 (discard) would hang or refuse; we must not get that far.
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(10)).unwrap();
        assert!(!api.validate(""));
        assert!(!api.validate("   "));
    }
}
