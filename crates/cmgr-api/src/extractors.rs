//! # Write Payload Extraction
//!
//! Create and update requests carry the same field→value object in one of
//! three encodings:
//!
//! - `application/json`: the object itself;
//! - `multipart/form-data`: a part named `data` holding the object as JSON
//!   text (other parts, such as file uploads, are ignored);
//! - `application/x-www-form-urlencoded`: a `data` key holding the JSON text.
//!
//! [`read_payload`] picks the decoder from the `Content-Type` header and
//! returns the raw JSON value. Decoding failures map to
//! [`AppError::BadRequest`]; field-level checks happen later in
//! `cmgr_schema::validate_write`.

use std::collections::HashMap;

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde_json::Value;

use crate::error::AppError;

/// Name of the form part or key carrying the JSON payload.
pub const DATA_FIELD: &str = "data";

/// Body encoding of a write request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Json,
    Multipart,
    UrlEncoded,
}

impl BodyEncoding {
    /// Classify a `Content-Type` header value. Anything that is not a form
    /// encoding is decoded as JSON (and rejected there if it is not JSON).
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());
        match mime.as_deref() {
            Some("multipart/form-data") => Self::Multipart,
            Some("application/x-www-form-urlencoded") => Self::UrlEncoded,
            _ => Self::Json,
        }
    }
}

/// Read the write payload of `request` as a JSON value.
pub async fn read_payload(request: Request) -> Result<Value, AppError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    match BodyEncoding::from_content_type(content_type) {
        BodyEncoding::Json => {
            let Json(value) = Json::<Value>::from_request(request, &())
                .await
                .map_err(|err| AppError::BadRequest(err.body_text()))?;
            Ok(value)
        }
        BodyEncoding::Multipart => {
            let mut multipart = Multipart::from_request(request, &())
                .await
                .map_err(|err| AppError::BadRequest(err.body_text()))?;
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|err| AppError::BadRequest(err.body_text()))?
            {
                if field.name() != Some(DATA_FIELD) {
                    continue;
                }
                let text = field
                    .text()
                    .await
                    .map_err(|err| AppError::BadRequest(err.body_text()))?;
                return parse_data(&text);
            }
            Err(missing_data())
        }
        BodyEncoding::UrlEncoded => {
            let Form(mut form) = Form::<HashMap<String, String>>::from_request(request, &())
                .await
                .map_err(|err| AppError::BadRequest(err.body_text()))?;
            let text = form.remove(DATA_FIELD).ok_or_else(missing_data)?;
            parse_data(&text)
        }
    }
}

fn parse_data(text: &str) -> Result<Value, AppError> {
    serde_json::from_str(text)
        .map_err(|err| AppError::BadRequest(format!("`{DATA_FIELD}` is not valid JSON: {err}")))
}

fn missing_data() -> AppError {
    AppError::BadRequest(format!("form body has no `{DATA_FIELD}` field"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    fn request(content_type: &str, body: impl Into<Body>) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, content_type)
            .body(body.into())
            .unwrap()
    }

    #[test]
    fn encoding_from_content_type() {
        assert_eq!(
            BodyEncoding::from_content_type(Some("application/json")),
            BodyEncoding::Json
        );
        assert_eq!(
            BodyEncoding::from_content_type(Some("multipart/form-data; boundary=x")),
            BodyEncoding::Multipart
        );
        assert_eq!(
            BodyEncoding::from_content_type(Some("Application/X-WWW-Form-Urlencoded")),
            BodyEncoding::UrlEncoded
        );
        assert_eq!(BodyEncoding::from_content_type(None), BodyEncoding::Json);
    }

    #[tokio::test]
    async fn reads_json_body() {
        let value = read_payload(request("application/json", r#"{"field": true}"#))
            .await
            .unwrap();
        assert_eq!(value, json!({"field": true}));
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let err = read_payload(request("application/json", "{ nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn reads_multipart_data_part() {
        let body = concat!(
            "--XBOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"files\"; filename=\"a.txt\"\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "ignored\r\n",
            "--XBOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"data\"\r\n",
            "\r\n",
            "{\"field\":\"\\\"Some string\\\"\"}\r\n",
            "--XBOUNDARY--\r\n",
        );
        let value = read_payload(request("multipart/form-data; boundary=XBOUNDARY", body))
            .await
            .unwrap();
        assert_eq!(value, json!({"field": "\"Some string\""}));
    }

    #[tokio::test]
    async fn multipart_without_data_part_is_bad_request() {
        let body = concat!(
            "--XBOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"other\"\r\n",
            "\r\n",
            "{}\r\n",
            "--XBOUNDARY--\r\n",
        );
        let err = read_payload(request("multipart/form-data; boundary=XBOUNDARY", body))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("data")));
    }

    #[tokio::test]
    async fn reads_urlencoded_data_key() {
        let body = "data=%7B%22field%22%3A%22one%22%7D";
        let value = read_payload(request("application/x-www-form-urlencoded", body))
            .await
            .unwrap();
        assert_eq!(value, json!({"field": "one"}));
    }

    #[tokio::test]
    async fn urlencoded_data_must_be_json() {
        let err = read_payload(request("application/x-www-form-urlencoded", "data=nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("not valid JSON")));
    }
}
