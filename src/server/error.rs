//! Request-level error taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Errors a `/music` request can produce.
///
/// Client mistakes map to 400, unreachable media to 404; mid-stream I/O
/// failures surface as 500 only when they happen before any body byte is
/// written. None of these ever crash the process.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// `audio_id` present but empty.
    #[error("Missing audio ID")]
    MissingAudioId,

    /// `audio_id` not parseable as an unsigned integer.
    #[error("Invalid audio ID")]
    InvalidAudioId,

    /// Well-formed id whose media cannot be reached.
    #[error("Audio file not found: {0}")]
    AudioNotFound(String),

    /// Album or its art does not exist.
    #[error("Album art not found")]
    ArtNotFound,

    /// Recognizable range syntax outside the supported forms.
    #[error("Malformed range")]
    MalformedRange,

    /// Failure while preparing the response stream.
    #[error("stream error: {0}")]
    Stream(#[from] std::io::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingAudioId | Self::InvalidAudioId | Self::MalformedRange => {
                StatusCode::BAD_REQUEST
            }
            Self::AudioNotFound(_) | Self::ArtNotFound => StatusCode::NOT_FOUND,
            Self::Stream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Stream(err) = &self {
            tracing::error!(error = %err, "failed to prepare stream response");
        }
        (self.status(), self.to_string()).into_response()
    }
}
