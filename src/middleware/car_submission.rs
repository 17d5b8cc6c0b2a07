use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;

use crate::CarlotError;

/// Name of the file part carrying the car image.
pub const IMG_FIELD: &str = "img";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Raw form submission: text fields plus an optional image upload.
///
/// Accepts `application/x-www-form-urlencoded` and `multipart/form-data`
/// bodies. Any other body is treated as an empty submission. When a field
/// repeats, the last value wins.
#[derive(Debug, Clone, Default)]
pub struct CarSubmission {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl CarSubmission {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn from_urlencoded(body: &[u8]) -> Self {
        let fields = url::form_urlencoded::parse(body)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { fields, file: None }
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, CarlotError> {
        let mut submission = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            if let Some(filename) = field.file_name().map(str::to_owned) {
                let bytes = field.bytes().await?;
                // browsers send an empty part when no file was chosen
                if name == IMG_FIELD && !bytes.is_empty() {
                    submission.file = Some(UploadedFile { filename, bytes });
                }
                continue;
            }
            let text = field.text().await?;
            submission.fields.insert(name, text);
        }
        Ok(submission)
    }
}

impl<S> FromRequest<S> for CarSubmission
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| CarlotError::from(e).into_response())?;
            return Self::from_multipart(multipart)
                .await
                .map_err(IntoResponse::into_response);
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| CarlotError::from(e).into_response())?;
            return Ok(Self::from_urlencoded(&body));
        }

        Ok(Self::default())
    }
}
