//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, unregistered shape types, rejected chart entries, render context
//! failures, JSON and image encoding failures, IO, and generic errors.
//!
//! Malformed shape options and chart slots without data are deliberately absent: the former
//! fall back to per-shape defaults and the latter render as placeholder cells.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown shape type '{name}'")]
    UnknownShapeType { name: String },

    #[error("invalid chart entry '{id}': {reason}")]
    InvalidEntry { id: String, reason: String },

    #[error("render context unavailable: {0}")]
    RenderContext(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        assert!(matches!(err, Error::Other(ref msg) if msg == "boom"));
    }

    #[test]
    fn unknown_shape_type_names_the_type() {
        let err = Error::UnknownShapeType {
            name: "doesNotExist".into(),
        };
        assert_eq!(err.to_string(), "unknown shape type 'doesNotExist'");
    }

    #[test]
    fn json_errors_convert_transparently() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
