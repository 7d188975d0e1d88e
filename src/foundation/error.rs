//! Crate error type.
//!
//! Every public operation returns [`PosterResult`]; the error kinds map one-to-one to the codes a
//! service layer reports.

use crate::schema::validate::SchemaErrors;

/// Result alias used across the crate.
pub type PosterResult<T> = Result<T, PosterError>;

/// Error kinds surfaced by the rendering engine.
///
/// Every kind carries a machine-readable [`code`](PosterError::code) and an HTTP-style
/// [`status`](PosterError::status) so a surrounding service layer can map it without string
/// matching. Low-level failures (io, decoding, networking) are folded into one of these kinds at
/// the boundary where they occur.
#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    /// Malformed color, geometry, template, photo, data, or an unsafe/oversized image source.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No template registered under the requested id.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// Template failed schema validation. Carries every issue found.
    #[error("template validation failed: {0}")]
    TemplateValidation(SchemaErrors),

    /// Font file present but unreadable or corrupt.
    #[error("font load error: {0}")]
    FontLoad(String),

    /// Network, timeout, or decoding failure not attributable to bad caller input.
    #[error("image processing error: {0}")]
    ImageProcessing(String),
}

impl PosterError {
    /// Build an [`PosterError::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build an [`PosterError::TemplateNotFound`].
    pub fn template_not_found(id: impl Into<String>) -> Self {
        Self::TemplateNotFound(id.into())
    }

    /// Build an [`PosterError::FontLoad`].
    pub fn font_load(msg: impl Into<String>) -> Self {
        Self::FontLoad(msg.into())
    }

    /// Build an [`PosterError::ImageProcessing`].
    pub fn image_processing(msg: impl Into<String>) -> Self {
        Self::ImageProcessing(msg.into())
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::TemplateNotFound(_) => "TEMPLATE_NOT_FOUND",
            Self::TemplateValidation(_) => "TEMPLATE_VALIDATION_ERROR",
            Self::FontLoad(_) => "FONT_LOAD_ERROR",
            Self::ImageProcessing(_) => "IMAGE_PROCESSING_ERROR",
        }
    }

    /// HTTP-style status for the surrounding layer.
    pub fn status(&self) -> u16 {
        match self {
            Self::InvalidInput(_) | Self::TemplateValidation(_) => 400,
            Self::TemplateNotFound(_) => 404,
            Self::FontLoad(_) | Self::ImageProcessing(_) => 500,
        }
    }
}

impl From<SchemaErrors> for PosterError {
    fn from(errors: SchemaErrors) -> Self {
        Self::TemplateValidation(errors)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
