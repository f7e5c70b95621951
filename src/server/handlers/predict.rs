use std::io::{Cursor, Read};

use log::warn;
use serde::Serialize;
use serde_json::Value;
use tiny_http::{Request, Response};

use crate::predictor::Predictor;
use crate::server::error::RequestError;
use crate::server::routes::json_response;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictResponse {
    pub prediction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// POST /predict
// ---------------------------------------------------------------------------

pub fn handle(request: &mut Request, predictor: &Predictor) -> Response<Cursor<Vec<u8>>> {
    let content_type = request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned());

    let mut body = Vec::new();
    let result = request.as_reader().read_to_end(&mut body)
        .map_err(RequestError::from)
        .and_then(|_| predict_from_body(content_type.as_deref(), &body, predictor));

    match result {
        Ok(prediction) => json_response(200, &PredictResponse { prediction }),
        Err(e) => {
            warn!("rejecting /predict request: {e}");
            json_response(400, &ErrorResponse { error: e.to_string() })
        }
    }
}

/// Decodes a raw request body and scores its `input` field.
pub fn predict_from_body(
    content_type: Option<&str>,
    body: &[u8],
    predictor: &Predictor,
) -> Result<f64, RequestError> {
    if !content_type.is_some_and(is_json) {
        return Err(RequestError::UnsupportedMediaType);
    }
    let payload: Value = serde_json::from_slice(body)?;
    let input = extract_input(&payload)?;
    Ok(predictor.predict(&input)?)
}

/// Pulls `input` out of the payload; a missing field reads as an empty list.
///
/// Nested arrays are flattened in row-major order as long as every level is
/// rectangular, and booleans count as 0/1, so `[[..5..], [..5..]]` and
/// `[true, false, ..]` both become one flat row.
pub fn extract_input(payload: &Value) -> Result<Vec<f64>, RequestError> {
    let object = payload.as_object().ok_or(RequestError::NotAnObject)?;
    let items = match object.get("input") {
        None => return Ok(Vec::new()),
        Some(value @ Value::Array(_)) => value,
        Some(_) => return Err(RequestError::InputNotArray),
    };
    let mut flat = Vec::new();
    flatten(items, "input", &mut flat)?;
    Ok(flat)
}

/// Appends the scalars under `value` to `out` and returns the shape of `value`.
fn flatten(value: &Value, path: &str, out: &mut Vec<f64>) -> Result<Vec<usize>, RequestError> {
    match value {
        Value::Array(items) => {
            let mut inner: Option<Vec<usize>> = None;
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                let shape = flatten(item, &item_path, out)?;
                if let Some(expected) = &inner {
                    if *expected != shape {
                        return Err(RequestError::Ragged { path: item_path });
                    }
                } else {
                    inner = Some(shape);
                }
            }
            let mut shape = vec![items.len()];
            shape.extend(inner.unwrap_or_default());
            Ok(shape)
        }
        Value::Bool(b) => {
            out.push(if *b { 1.0 } else { 0.0 });
            Ok(Vec::new())
        }
        other => {
            let x = other.as_f64().ok_or_else(|| RequestError::NonNumeric { path: path.to_owned() })?;
            out.push(x);
            Ok(Vec::new())
        }
    }
}

/// `application/json` or any `application/*+json`, parameters ignored.
fn is_json(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
