use background_remover::Error as SegmentError;
use image_effect::ImageEffectError;
use image_search::SearchError;

pub type Result<T> = std::result::Result<T, AppError>;

/// Everything an interaction can fail with. None of these end the process;
/// they are shown to the user as a warning or error block.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("The uploaded file could not be read as an image: {0}")]
    CorruptImage(String),

    #[error("The uploaded file is too large. Please upload an image smaller than {}MB.", .limit / (1024 * 1024))]
    OversizeUpload { size: u64, limit: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Processing failed: {0}")]
    Processing(String),

    #[error("Please enter a search query.")]
    EmptyQuery,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Recoverable input problems are warnings, the rest are errors.
    pub fn is_warning(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::EmptyQuery)
    }
}

impl From<ImageEffectError> for AppError {
    fn from(e: ImageEffectError) -> Self {
        match e {
            ImageEffectError::InvalidImage(msg) => AppError::InvalidImage(msg),
            ImageEffectError::UnsupportedFormat(msg) => AppError::UnsupportedFormat(msg),
            ImageEffectError::CorruptImage(msg) => AppError::CorruptImage(msg),
            ImageEffectError::Io(e) => AppError::Io(e),
            e @ (ImageEffectError::InvalidParameter(_) | ImageEffectError::Image(_)) => {
                AppError::Processing(e.to_string())
            }
        }
    }
}

impl From<SegmentError> for AppError {
    fn from(e: SegmentError) -> Self {
        AppError::Processing(e.to_string())
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::EmptyQuery => AppError::EmptyQuery,
            e => AppError::Network(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = AppError::OversizeUpload {
            size: 6 * 1024 * 1024,
            limit: 5 * 1024 * 1024,
        };
        assert_eq!(
            e.to_string(),
            "The uploaded file is too large. Please upload an image smaller than 5MB."
        );
        assert!(!e.is_warning());

        assert_eq!(AppError::EmptyQuery.to_string(), "Please enter a search query.");
        assert!(AppError::EmptyQuery.is_warning());
    }

    #[test]
    fn test_conversions() {
        let e: AppError = ImageEffectError::CorruptImage("x".into()).into();
        assert!(matches!(e, AppError::CorruptImage(_)));

        let e: AppError = ImageEffectError::InvalidParameter("k".into()).into();
        assert!(matches!(e, AppError::Processing(_)));

        let e: AppError = SearchError::EmptyQuery.into();
        assert!(matches!(e, AppError::EmptyQuery));

        let e: AppError = SearchError::Status {
            status: 503,
            url: "https://unsplash.com/s/photos/cat".into(),
        }
        .into();
        assert!(matches!(e, AppError::Network(_)));
        assert!(e.is_warning());

        let e: AppError = SegmentError::InvalidOutput("boom".into()).into();
        assert!(matches!(e, AppError::Processing(_)));
    }
}
