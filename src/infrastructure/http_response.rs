// HTTP response utilities for page and chart markup
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Build a 200 response carrying `body` with the given content type
pub fn markup_response(content_type: &'static str, body: String) -> Result<Response<Body>, StatusCode> {
    let length = HeaderValue::from_str(&body.len().to_string()).map_err(|e| {
        tracing::error!("Invalid content length header: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, length)
        // regions change as panels load and resize
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(body))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

pub fn html_response(body: String) -> Result<Response<Body>, StatusCode> {
    markup_response(HTML_CONTENT_TYPE, body)
}

pub fn svg_response(body: String) -> Result<Response<Body>, StatusCode> {
    markup_response(SVG_CONTENT_TYPE, body)
}

pub fn text_response(body: String) -> Result<Response<Body>, StatusCode> {
    markup_response(TEXT_CONTENT_TYPE, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_response_headers() {
        let response = svg_response("<svg></svg>".to_string()).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], SVG_CONTENT_TYPE);
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "11");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    }

    #[test]
    fn test_content_length_counts_bytes() {
        let response = text_response("a\u{00A0}b".to_string()).unwrap();
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "4");
    }
}
