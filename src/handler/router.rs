//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method check, route matching,
//! HEAD handling and the access log line.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use super::classify::{self, CLASSIFY_PATH};
use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};

const HOME_MESSAGE: &str = "This is the home route, you need to go to /api/v1/classify-number?number={any number of your choice} to try out this endpoint";
const NOT_FOUND_MESSAGE: &str = "Route is not available, check route or try again later";

/// 404 body for the home and catch-all routes
#[derive(Debug, Serialize)]
pub struct RouteMessage {
    pub success: bool,
    pub message: &'static str,
}

/// Main entry point for HTTP request handling
///
/// Generic over the body type; no route reads the request body.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);

    let mut response = route_request(&method, &path, query.as_deref(), &state).await;
    if method == Method::HEAD {
        response = http::strip_body(response);
    }

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(remote_addr.ip().to_string(), method.to_string(), path);
        entry.query = query;
        entry.http_version = format!("{:?}", req.version())
            .trim_start_matches("HTTP/")
            .to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.referer = header_value(&req, "referer");
        entry.user_agent = header_value(&req, "user-agent");
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on method and path
async fn route_request(
    method: &Method,
    path: &str,
    query: Option<&str>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let http_config = &state.config.http;

    match (method, path) {
        (&Method::OPTIONS, _) => http::build_options_response(http_config),
        (&Method::GET | &Method::HEAD, "/") => route_message(HOME_MESSAGE, state),
        (&Method::GET | &Method::HEAD, CLASSIFY_PATH) => {
            classify::classify_number(query, state).await
        }
        _ => route_message(NOT_FOUND_MESSAGE, state),
    }
}

fn route_message(message: &'static str, state: &AppState) -> Response<Full<Bytes>> {
    let body = RouteMessage {
        success: false,
        message,
    };
    http::json_response(StatusCode::NOT_FOUND, &body, &state.config.http)
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::facts::fake::{EchoFacts, FailingFacts};
    use crate::facts::FactProvider;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};

    fn test_state(facts: Arc<dyn FactProvider>) -> Arc<AppState> {
        let mut config = Config::build("does-not-exist/number-classifier", None).unwrap();
        config.logging.access_log = false;
        Arc::new(AppState::with_provider(&config, facts))
    }

    async fn send(state: &Arc<AppState>, method: Method, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        let addr: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        let resp = handle_request(req, Arc::clone(state), addr).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_classify_armstrong_number() {
        let state = test_state(Arc::new(EchoFacts));
        let (status, body) = send(&state, Method::GET, "/api/v1/classify-number?number=153").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "number": 153,
                "is_prime": false,
                "is_perfect": false,
                "properties": ["armstrong", "odd"],
                "digit_sum": 9,
                "fun_fact": "153 is a test number",
            })
        );
    }

    #[tokio::test]
    async fn test_classify_perfect_and_prime() {
        let state = test_state(Arc::new(EchoFacts));

        let (_, body) = send(&state, Method::GET, "/api/v1/classify-number?number=28").await;
        assert_eq!(body["is_perfect"], true);
        assert_eq!(body["properties"], json!(["even"]));

        let (_, body) = send(&state, Method::GET, "/api/v1/classify-number?number=13").await;
        assert_eq!(body["is_prime"], true);
        assert_eq!(body["digit_sum"], 4);
    }

    #[tokio::test]
    async fn test_classify_negative_and_fractional() {
        let state = test_state(Arc::new(EchoFacts));
        let (status, body) =
            send(&state, Method::GET, "/api/v1/classify-number?number=-12.9").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["number"], -12);
        assert_eq!(body["is_prime"], false);
        assert_eq!(body["digit_sum"], 3);
        assert_eq!(body["properties"], json!(["even"]));
    }

    #[tokio::test]
    async fn test_classify_exponent_and_hex_input() {
        let state = test_state(Arc::new(EchoFacts));

        let (status, body) = send(&state, Method::GET, "/api/v1/classify-number?number=1e3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["number"], 1000);
        assert_eq!(body["digit_sum"], 1);
        assert_eq!(body["fun_fact"], "1000 is a test number");

        let (status, body) =
            send(&state, Method::GET, "/api/v1/classify-number?number=0x10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["number"], 16);
    }

    #[tokio::test]
    async fn test_classify_largest_i64_prime() {
        let state = test_state(Arc::new(EchoFacts));
        let (status, body) = send(
            &state,
            Method::GET,
            "/api/v1/classify-number?number=9223372036854775783",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["number"], 9_223_372_036_854_775_783_i64);
        assert_eq!(body["is_prime"], true);
        assert_eq!(body["is_perfect"], false);
    }

    #[tokio::test]
    async fn test_invalid_number() {
        let state = test_state(Arc::new(EchoFacts));
        let (status, body) = send(&state, Method::GET, "/api/v1/classify-number?number=abc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "number": "abc", "error": true }));
    }

    #[tokio::test]
    async fn test_missing_number() {
        let state = test_state(Arc::new(EchoFacts));
        let (status, body) = send(&state, Method::GET, "/api/v1/classify-number").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "number": "undefined", "error": true }));
    }

    #[tokio::test]
    async fn test_unreachable_provider_still_succeeds() {
        let state = test_state(Arc::new(FailingFacts));
        let (status, body) = send(&state, Method::GET, "/api/v1/classify-number?number=7").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_prime"], true);
        assert_eq!(body["fun_fact"], "Sorry, No fun fact available for 7");
    }

    #[tokio::test]
    async fn test_home_route() {
        let state = test_state(Arc::new(EchoFacts));
        let (status, body) = send(&state, Method::GET, "/").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("/api/v1/classify-number?number="));
    }

    #[tokio::test]
    async fn test_unknown_route_and_method() {
        let state = test_state(Arc::new(EchoFacts));
        let expected = json!({ "success": false, "message": NOT_FOUND_MESSAGE });

        let (status, body) = send(&state, Method::GET, "/foo").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, expected);

        let (status, body) = send(&state, Method::POST, "/api/v1/classify-number?number=1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn test_options_and_head() {
        let state = test_state(Arc::new(EchoFacts));

        let (status, body) = send(&state, Method::OPTIONS, "/api/v1/classify-number").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, body) = send(&state, Method::HEAD, "/api/v1/classify-number?number=6").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }
}
