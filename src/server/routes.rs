use std::io::Cursor;
use std::sync::Arc;

use log::{error, info};
use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::predictor::Predictor;
use crate::server::handlers;
use crate::server::handlers::predict::ErrorResponse;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Sent when a response value cannot be serialized.
const ENCODE_FAILURE_BODY: &[u8] = br#"{"error":"failed to encode response"}"#;

pub fn json_response<T: Serialize>(status: u16, body: &T) -> Response<Cursor<Vec<u8>>> {
    let (status, bytes) = encode_body(status, body);
    let len = bytes.len();
    Response::new(
        StatusCode(status),
        vec![Header::from_bytes(b"Content-Type", b"application/json")
            .expect("static header is well-formed")],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

/// Serializes `body`, falling back to a fixed 500 error body on failure.
fn encode_body<T: Serialize>(status: u16, body: &T) -> (u16, Vec<u8>) {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, bytes),
        Err(e) => {
            error!("failed to encode {status} response body: {e}");
            (500, ENCODE_FAILURE_BODY.to_vec())
        }
    }
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    json_response(404, &ErrorResponse { error: "not found".to_owned() })
}

pub fn method_not_allowed() -> Response<Cursor<Vec<u8>>> {
    json_response(405, &ErrorResponse { error: "method not allowed".to_owned() })
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Routes one request and writes its response, logging an access line.
pub fn dispatch(mut request: Request, predictor: Arc<Predictor>) {
    let method = request.method().clone();
    let url    = request.url().to_owned();
    let path   = url.split('?').next().unwrap_or("");

    let response = match (&method, path) {
        (Method::Post, "/predict") => handlers::predict::handle(&mut request, &predictor),
        (_, "/predict")            => method_not_allowed(),
        _                          => not_found(),
    };

    info!("{} {} {}", method, url, response.status_code().0);
    if let Err(e) = request.respond(response) {
        info!("client went away before response was written: {e}");
    }
}
