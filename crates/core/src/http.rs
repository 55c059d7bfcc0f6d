//! Blocking HTTP GET wrapper
//!
//! Failures never surface as `Err`: transport problems, non-2xx statuses and
//! undecodable JSON are all reported inside [`HttpResponse`].

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::HttpSettings;

/// Outcome of a GET request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpResponse<T> {
    /// True iff `status` is in [200, 300)
    pub ok: bool,
    /// HTTP status, or 0 when no response was received
    pub status: u16,
    pub body: Option<T>,
    pub error: Option<String>,
}

impl HttpResponse<String> {
    pub fn from_status(status: u16, body: String) -> Self {
        Self {
            ok: (200..300).contains(&status),
            status,
            body: Some(body),
            error: None,
        }
    }

    pub fn transport_error(err: impl Display) -> Self {
        Self {
            ok: false,
            status: 0,
            body: None,
            error: Some(err.to_string()),
        }
    }

    /// Parse the body as JSON. A body that does not parse turns the response
    /// into a failure carrying a decode error.
    pub fn into_json(self) -> HttpResponse<Value> {
        let HttpResponse {
            ok,
            status,
            body,
            error,
        } = self;

        match body.map(|text| serde_json::from_str::<Value>(&text)) {
            None => HttpResponse {
                ok,
                status,
                body: None,
                error,
            },
            Some(Ok(value)) => HttpResponse {
                ok,
                status,
                body: Some(value),
                error,
            },
            Some(Err(e)) => HttpResponse {
                ok: false,
                status,
                body: None,
                error: Some(format!("JSON decode error: {}", e)),
            },
        }
    }
}

pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// GET `url` with the given query parameters, returning the body as text
    pub fn get(&self, url: &str, query: &[(&str, &str)]) -> HttpResponse<String> {
        self.send(url, query, None)
    }

    /// GET `url` and decode the body as JSON
    pub fn get_json(&self, url: &str, query: &[(&str, &str)]) -> HttpResponse<Value> {
        self.send(url, query, Some("application/json")).into_json()
    }

    fn send(&self, url: &str, query: &[(&str, &str)], accept: Option<&str>) -> HttpResponse<String> {
        let mut request = self.client.get(url).query(query);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let result = request.send().and_then(|resp| {
            let status = resp.status().as_u16();
            resp.text().map(|body| (status, body))
        });

        match result {
            Ok((status, body)) => {
                debug!(url, status, "GET completed");
                HttpResponse::from_status(status, body)
            }
            Err(e) => {
                warn!(url, error = %e, "GET failed");
                HttpResponse::transport_error(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_classification() {
        assert!(HttpResponse::from_status(200, String::new()).ok);
        assert!(HttpResponse::from_status(204, String::new()).ok);
        assert!(!HttpResponse::from_status(301, String::new()).ok);
        assert!(!HttpResponse::from_status(404, String::new()).ok);
        assert!(!HttpResponse::from_status(199, String::new()).ok);
    }

    #[test]
    fn test_into_json_parses_body() {
        let resp = HttpResponse::from_status(200, r#"{"results": []}"#.to_string()).into_json();
        assert!(resp.ok);
        assert_eq!(resp.body, Some(json!({"results": []})));
        assert_eq!(resp.error, None);
    }

    #[test]
    fn test_into_json_decode_error() {
        let resp = HttpResponse::from_status(200, "<html>".to_string()).into_json();
        assert!(!resp.ok);
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, None);
        assert!(resp.error.unwrap().starts_with("JSON decode error"));
    }

    #[test]
    fn test_transport_error_shape() {
        let resp = HttpResponse::transport_error("connection refused").into_json();
        assert_eq!(resp.status, 0);
        assert!(!resp.ok);
        assert_eq!(resp.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_get_unreachable_host() {
        let client = HttpClient::new(&HttpSettings {
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        let resp = client.get("http://127.0.0.1:9/", &[]);
        assert_eq!(resp.status, 0);
        assert!(resp.error.is_some());

        let resp = client.get_json("not a url", &[("q", "x")]);
        assert_eq!(resp.status, 0);
        assert!(!resp.ok);
    }

    #[test]
    fn test_response_serializes_nulls() {
        let resp = HttpResponse::transport_error("boom");
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"ok": false, "status": 0, "body": null, "error": "boom"})
        );
    }
}
