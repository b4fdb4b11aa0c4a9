//! Reads the `json` + file parts of a listing form

use axum::extract::Multipart;
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use crate::application::MediaUpload;
use crate::infrastructure::storage::MediaKind;
use crate::interfaces::http::common::ApiError;

pub const JSON_FIELD: &str = "json";
pub const IMAGES_FIELD: &str = "images";
pub const VIDEOS_FIELD: &str = "videos";

fn media_kind(field_name: &str) -> Option<MediaKind> {
    match field_name.trim_end_matches("[]") {
        IMAGES_FIELD => Some(MediaKind::Image),
        VIDEOS_FIELD => Some(MediaKind::Video),
        _ => None,
    }
}

/// Parse a listing form. The `json` part is required; empty file parts are skipped.
pub async fn read_listing_form<T>(mut multipart: Multipart) -> Result<(T, Vec<MediaUpload>), ApiError>
where
    T: DeserializeOwned + Validate,
{
    let mut payload: Option<T> = None;
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == JSON_FIELD {
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read json field: {}", e)))?;
            let value: T = serde_json::from_slice(&data)
                .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))?;
            payload = Some(value);
        } else if let Some(kind) = media_kind(&name) {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read '{}': {}", name, e)))?;
            if file_name.is_empty() || bytes.is_empty() {
                continue;
            }
            debug!(field = %name, file = %file_name, size = bytes.len(), "Received upload");
            uploads.push(MediaUpload {
                kind,
                file_name,
                bytes: bytes.to_vec(),
            });
        } else {
            debug!(field = %name, "Ignoring unknown multipart field");
        }
    }

    let payload = payload
        .ok_or_else(|| ApiError::bad_request(format!("Missing '{}' field", JSON_FIELD)))?;
    payload
        .validate()
        .map_err(|errors| ApiError::unprocessable(&errors))?;

    Ok((payload, uploads))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_map_to_media_kinds() {
        assert_eq!(media_kind("images"), Some(MediaKind::Image));
        assert_eq!(media_kind("videos[]"), Some(MediaKind::Video));
        assert_eq!(media_kind("json"), None);
        assert_eq!(media_kind("other"), None);
    }
}
