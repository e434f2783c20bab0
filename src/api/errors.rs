use thiserror::Error;

use crate::manifest::ManifestError;
use crate::types::errors::ErrorKind;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("staging destination already occupied: {0}")]
    AlreadyStaged(String),
    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl From<crate::types::errors::Error> for ApiError {
    fn from(e: crate::types::errors::Error) -> Self {
        match e.kind {
            ErrorKind::AlreadyExists => ApiError::AlreadyStaged(e.msg),
            _ => ApiError::Filesystem(e.msg),
        }
    }
}

// Stable identifiers for summary facts and operator tooling.
// SCREAMING_SNAKE_CASE matches the emitted IDs.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug)]
pub enum ErrorId {
    E_MANIFEST,
    E_NOT_FOUND,
    E_COLLISION,
    E_ALREADY_STAGED,
    E_IO,
    E_GENERIC,
}

#[must_use]
pub const fn id_str(id: ErrorId) -> &'static str {
    match id {
        ErrorId::E_MANIFEST => "E_MANIFEST",
        ErrorId::E_NOT_FOUND => "E_NOT_FOUND",
        ErrorId::E_COLLISION => "E_COLLISION",
        ErrorId::E_ALREADY_STAGED => "E_ALREADY_STAGED",
        ErrorId::E_IO => "E_IO",
        ErrorId::E_GENERIC => "E_GENERIC",
    }
}

#[must_use]
pub const fn exit_code_for(id: ErrorId) -> i32 {
    match id {
        ErrorId::E_MANIFEST => 10,
        ErrorId::E_NOT_FOUND => 20,
        ErrorId::E_COLLISION => 30,
        ErrorId::E_ALREADY_STAGED => 40,
        ErrorId::E_IO => 50,
        ErrorId::E_GENERIC => 1,
    }
}

/// Classify an error for the summary facts.
#[must_use]
pub fn error_id_for(e: &ApiError) -> ErrorId {
    match e {
        ApiError::Manifest(ManifestError::FileNotFound { .. }) => ErrorId::E_NOT_FOUND,
        ApiError::Manifest(ManifestError::MangleCollision { .. }) => ErrorId::E_COLLISION,
        ApiError::Manifest(_) => ErrorId::E_MANIFEST,
        ApiError::AlreadyStaged(_) => ErrorId::E_ALREADY_STAGED,
        ApiError::Filesystem(_) => ErrorId::E_IO,
    }
}
