use crate::config::Settings;
use crate::error::{CatalogError, Result};
use crate::model::course::RawResult;
use crate::source::cache::DetailCache;
use crate::source::{payload, CatalogSource};

use rand::{thread_rng, Rng};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use std::{thread, time::Duration};

const BASE_DELAY_MS: u64 = 800;
// 800ms << 6 is already ~51s
const MAX_BACKOFF_EXP: u32 = 6;
const USER_AGENT: &str = concat!("cab-core/", env!("CARGO_PKG_VERSION"));

fn backoff(attempt: usize) -> Duration {
    let jitter: u64 = thread_rng().gen_range(0..200);
    let exp = u32::try_from(attempt).unwrap_or(u32::MAX).min(MAX_BACKOFF_EXP);
    let ms = BASE_DELAY_MS.saturating_mul(1 << exp).saturating_add(jitter);
    Duration::from_millis(ms)
}

fn should_retry_http(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

fn http_error(status: StatusCode, body_text: &str) -> CatalogError {
    let trimmed = body_text.trim();
    let message = if trimmed.len() > 400 {
        let cut = (0..=400).rev().find(|&i| trimmed.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &trimmed[..cut])
    } else {
        trimmed.to_string()
    };

    CatalogError::Http {
        status: status.as_u16(),
        message,
    }
}

/// Blocking client for the course catalog's `fose` API.
pub struct CabClient {
    client: Client,
    base_url: String,
    term: String,
    include_ind_study: bool,
    include_canc: bool,
    max_retries: usize,
    cache: Option<DetailCache>,
}

impl CabClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        let cache = settings
            .cache_details
            .then(|| DetailCache::new(settings.details_cache_dir()));

        Ok(CabClient {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            term: settings.term.clone(),
            include_ind_study: settings.include_independent_study,
            include_canc: settings.include_cancelled,
            max_retries: settings.max_retries,
            cache,
        })
    }

    /// The catalog landing page; its subject dropdown lists every department.
    pub fn home_page(&self) -> Result<String> {
        let url = format!("{}/", self.base_url);
        self.execute(|| self.client.get(&url))
    }

    fn search_url(&self, dept_code: &str) -> String {
        let mut url = format!("{}/api/?page=fose&route=search", self.base_url);
        if !self.include_ind_study {
            url.push_str("&is_ind_study=N");
        }
        if !self.include_canc {
            url.push_str("&is_canc=N");
        }
        url.push_str("&subject=");
        url.push_str(&urlencoding::encode(dept_code));
        url
    }

    fn post_json(&self, url: &str, body: String) -> Result<Value> {
        let text = self.execute(|| self.client.post(url).body(body.clone()))?;
        serde_json::from_str(&text)
            .map_err(|e| CatalogError::UnexpectedResponse(format!("invalid JSON from {url}: {e}")))
    }

    /// Sends the request, retrying timeouts, rate limits, 5xx and transport errors.
    fn execute<F>(&self, build: F) -> Result<String>
    where
        F: Fn() -> RequestBuilder,
    {
        let attempts = self.max_retries.max(1);
        let mut last_err: Option<CatalogError> = None;

        for attempt in 0..attempts {
            match build().send() {
                Ok(resp) => {
                    let status = resp.status();

                    let text = match resp.text() {
                        Ok(t) => t,
                        Err(err) => {
                            last_err = Some(err.into());
                            if attempt + 1 < attempts {
                                thread::sleep(backoff(attempt));
                            }
                            continue;
                        }
                    };

                    if status.is_success() {
                        return Ok(text);
                    }

                    let retry = should_retry_http(status);
                    last_err = Some(http_error(status, &text));
                    if retry && attempt + 1 < attempts {
                        warn!(status = status.as_u16(), attempt, "retrying catalog request");
                        thread::sleep(backoff(attempt));
                        continue;
                    }
                    break;
                }
                Err(err) => {
                    last_err = Some(err.into());
                    if attempt + 1 < attempts {
                        warn!(attempt, "catalog request failed, retrying");
                        thread::sleep(backoff(attempt));
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| CatalogError::Transport("no request attempted".into())))
    }
}

impl CatalogSource for CabClient {
    fn search(&self, dept_code: &str) -> Result<Vec<RawResult>> {
        let body = payload::search(&self.term, dept_code, self.include_ind_study, self.include_canc);
        let mut resp = self.post_json(&self.search_url(dept_code), body)?;

        let Some(results) = resp.get_mut("results").map(Value::take) else {
            let reason = resp
                .get("fatal")
                .and_then(|v| v.as_str())
                .unwrap_or("missing results");
            return Err(CatalogError::UnexpectedResponse(format!(
                "search {dept_code}: {reason}"
            )));
        };

        let rows: Vec<RawResult> = serde_json::from_value(results)?;
        info!("retrieved {} courses from {}", rows.len(), dept_code);
        Ok(rows)
    }

    fn details(&self, dept_code: &str, crn: &str) -> Result<Map<String, Value>> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&self.term, dept_code, crn) {
                debug!(dept_code, crn, "details cache hit");
                return Ok(hit);
            }
        }

        let url = format!("{}/api/?page=fose&route=details", self.base_url);
        let body = payload::details(&self.term, dept_code, crn);

        let details = match self.post_json(&url, body)? {
            Value::Object(map) => map,
            other => {
                return Err(CatalogError::UnexpectedResponse(format!(
                    "details {dept_code} {crn}: expected object, got {other}"
                )))
            }
        };

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&self.term, dept_code, crn, &details) {
                warn!(dept_code, crn, error = %e, "failed to cache details");
            }
        }

        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(settings: Settings) -> CabClient {
        CabClient::new(&settings).unwrap()
    }

    #[test]
    fn search_url_follows_inclusion_flags() {
        let c = client(Settings {
            base_url: "https://cab.example.edu/".into(),
            cache_details: false,
            ..Settings::default()
        });
        assert_eq!(
            c.search_url("AFRI"),
            "https://cab.example.edu/api/?page=fose&route=search&is_ind_study=N&is_canc=N&subject=AFRI"
        );

        let c = client(Settings {
            include_independent_study: true,
            include_cancelled: true,
            cache_details: false,
            ..Settings::default()
        });
        assert!(c.search_url("CSCI").ends_with("route=search&subject=CSCI"));
    }

    #[test]
    fn backoff_is_capped_for_large_retry_counts() {
        let first = backoff(0);
        assert!(first >= Duration::from_millis(BASE_DELAY_MS));
        assert!(first < Duration::from_millis(BASE_DELAY_MS + 200));

        let cap = Duration::from_millis(BASE_DELAY_MS << MAX_BACKOFF_EXP);
        for attempt in [6, 55, 64, 1_000, usize::MAX] {
            let d = backoff(attempt);
            assert!(d >= cap && d < cap + Duration::from_millis(200));
        }
    }

    #[test]
    fn retry_policy() {
        assert!(should_retry_http(StatusCode::TOO_MANY_REQUESTS));
        assert!(should_retry_http(StatusCode::BAD_GATEWAY));
        assert!(!should_retry_http(StatusCode::NOT_FOUND));
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "é".repeat(300);
        match http_error(StatusCode::INTERNAL_SERVER_ERROR, &body) {
            CatalogError::Http { status, message } => {
                assert_eq!(status, 500);
                assert!(message.ends_with("..."));
                assert!(message.len() <= 403);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
