//! Mock HTTP server
//!
//! An axum app with a single fallback handler: every request, whatever its
//! method or path, is answered by the [`MockResponder`].

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::Response;
use axum::Router;
use hyper::ext::ReasonPhrase;

use super::responder::MockResponder;
use crate::error::Result;
use crate::model::{parse_urlencoded, CaseInsensitiveMap, ExampleRequest, ExampleResponse};

/// Recorded headers the server recomputes itself
const SKIPPED_HEADERS: [&str; 2] = ["content-length", "transfer-encoding"];

/// Router answering every request from recorded examples
pub fn router(responder: Arc<MockResponder>) -> Router {
    Router::new().fallback(handle).with_state(responder)
}

/// Bind `addr` and serve until the process stops
pub async fn serve(responder: Arc<MockResponder>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Mock server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(responder)).await?;
    Ok(())
}

async fn handle(
    State(responder): State<Arc<MockResponder>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = inbound_request(&method, &uri, &headers, &body);
    let recorded = responder.respond(&request);
    build_response(&recorded)
}

/// Describe an inbound request the way examples are recorded
pub fn inbound_request(method: &Method, uri: &Uri, headers: &HeaderMap, body: &[u8]) -> ExampleRequest {
    let mut request = ExampleRequest::new(method.as_str(), uri.path());
    request.query_strings = parse_urlencoded(uri.query().unwrap_or_default());

    let mut header_map = CaseInsensitiveMap::new();
    for (name, value) in headers {
        match value.to_str() {
            Ok(value) => {
                header_map.insert(name.as_str(), value.to_string());
            }
            Err(_) => tracing::debug!(header = %name, "ignoring non-text header value"),
        }
    }
    request.headers = header_map;

    if !body.is_empty() {
        let text = String::from_utf8_lossy(body).into_owned();
        let is_form = request
            .headers
            .get("content-type")
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
        if is_form {
            request.form_params = Some(parse_urlencoded(&text));
        }
        request.body = Some(text);
    }
    request
}

/// Turn a recorded response into an HTTP response
pub fn build_response(recorded: &ExampleResponse) -> Response {
    let status = StatusCode::from_u16(recorded.status).unwrap_or_else(|_| {
        tracing::warn!(status = recorded.status, "recorded status is not valid HTTP");
        StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut response = Response::new(Body::from(recorded.body.clone().unwrap_or_default()));
    *response.status_mut() = status;

    for (name, value) in recorded.headers.iter() {
        if SKIPPED_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
            continue;
        }
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().append(name, value);
            }
            _ => tracing::warn!(header = %name, "skipping invalid recorded header"),
        }
    }

    if let Some(reason) = &recorded.reason {
        match ReasonPhrase::try_from(reason.clone().into_bytes()) {
            Ok(phrase) => {
                response.extensions_mut().insert(phrase);
            }
            Err(_) => tracing::warn!(%reason, "skipping invalid reason phrase"),
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::responder::NOT_FOUND_REASON;

    #[test]
    fn test_inbound_request() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        let uri: Uri = "/user/?tag=a&tag=b".parse().unwrap();

        let request = inbound_request(&Method::POST, &uri, &headers, b"name=Ella&age=16");
        assert_eq!(request.method, "post");
        assert_eq!(request.path, "/user/");
        assert_eq!(request.query_strings.len(), 1);
        assert_eq!(request.form_params.as_ref().unwrap().len(), 2);
        assert_eq!(request.body.as_deref(), Some("name=Ella&age=16"));
        assert!(request.headers.contains_key("Content-Type"));
    }

    #[test]
    fn test_build_response() {
        let mut recorded = ExampleResponse::new(401);
        recorded.reason = Some("Not Authorized".to_string());
        recorded.headers.insert("X-Trace", "abc".to_string());
        recorded.headers.insert("Content-Length", "999".to_string());
        recorded.headers.insert("Bad Header", "x".to_string());

        let response = build_response(&recorded);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()["x-trace"], "abc");
        assert!(response.headers().get("content-length").is_none());
        assert_eq!(
            response.extensions().get::<ReasonPhrase>().unwrap().as_bytes(),
            b"Not Authorized"
        );
    }

    #[test]
    fn test_not_found_reason() {
        let response = build_response(&crate::mock::responder::not_found());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.extensions().get::<ReasonPhrase>().unwrap().as_bytes(),
            NOT_FOUND_REASON.as_bytes()
        );
    }
}
