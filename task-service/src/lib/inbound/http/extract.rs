use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use serde::Deserialize;
use serde::Deserializer;

use super::handlers::ApiError;

/// JSON body extractor whose rejections use the API error envelope.
///
/// Request DTOs are `deny_unknown_fields`, so unknown keys, wrong types and
/// malformed JSON all surface here as 400 validation errors.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct StrictJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_body(rejection.body_text())
    }
}

/// Keep the difference between an absent key and an explicit `null`.
///
/// Use with `#[serde(default, deserialize_with = "present")]` on an
/// `Option<Option<T>>` field: absent => `None`, `null` => `Some(None)`,
/// value => `Some(Some(value))`.
pub fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
