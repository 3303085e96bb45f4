//! HTTP response building module
//!
//! JSON bodies, CORS preflight and HEAD handling, decoupled from the routes.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::config::HttpConfig;

const INTERNAL_ERROR_BODY: &str = r#"{"error":"Internal server error"}"#;

/// Build a JSON response with the common headers
pub fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    http_config: &HttpConfig,
) -> Response<Full<Bytes>> {
    match serde_json::to_string(body) {
        Ok(json) => build_json(status, json, http_config),
        Err(e) => {
            log_error(&format!("Failed to serialize response: {e}"));
            build_internal_error_response(http_config)
        }
    }
}

/// Build 500 Internal Server Error response
pub fn build_internal_error_response(http_config: &HttpConfig) -> Response<Full<Bytes>> {
    build_json(
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_ERROR_BODY.to_string(),
        http_config,
    )
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(http_config: &HttpConfig) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Server", &http_config.server_name)
        .header("Allow", "GET, HEAD, OPTIONS");

    if http_config.enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Drop the body of a response to a HEAD request, keeping `Content-Length`
pub fn strip_body(response: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    let (parts, _) = response.into_parts();
    Response::from_parts(parts, Full::new(Bytes::new()))
}

fn build_json(
    status: StatusCode,
    json: String,
    http_config: &HttpConfig,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .header("Content-Length", json.len())
        .header("Server", &http_config.server_name);

    if http_config.enable_cors {
        builder = builder.header("Access-Control-Allow-Origin", "*");
    }

    builder
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut fallback = Response::new(Full::new(Bytes::from(INTERNAL_ERROR_BODY)));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

fn log_error(message: &str) {
    crate::logger::log_error(message);
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn http_config(enable_cors: bool) -> HttpConfig {
        HttpConfig {
            server_name: "number-classifier".to_string(),
            enable_cors,
        }
    }

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_json_response_headers_and_body() {
        let body = serde_json::json!({ "success": false });
        let resp = json_response(StatusCode::NOT_FOUND, &body, &http_config(true));

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers()["Content-Type"],
            "application/json; charset=utf-8"
        );
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
        assert_eq!(resp.headers()["Server"], "number-classifier");
        assert_eq!(body_string(resp).await, r#"{"success":false}"#);
    }

    #[test]
    fn test_cors_header_disabled() {
        let resp = json_response(StatusCode::OK, &1, &http_config(false));
        assert!(resp.headers().get("Access-Control-Allow-Origin").is_none());
    }

    #[test]
    fn test_options_response() {
        let resp = build_options_response(&http_config(true));
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            resp.headers()["Access-Control-Allow-Methods"],
            "GET, HEAD, OPTIONS"
        );
    }

    #[tokio::test]
    async fn test_strip_body_keeps_length() {
        let resp = json_response(StatusCode::OK, &"abc", &http_config(true));
        let stripped = strip_body(resp);
        assert_eq!(stripped.headers()["Content-Length"], "5");
        assert_eq!(body_string(stripped).await, "");
    }

    #[tokio::test]
    async fn test_internal_error_response() {
        let resp = build_internal_error_response(&http_config(true));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(resp).await, INTERNAL_ERROR_BODY);
    }
}
