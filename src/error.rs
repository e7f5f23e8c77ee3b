// ============================================================================
// ERRORS - the three failure kinds surfaced to the user
// ============================================================================
//
// `Display` is plain English and goes to the session log; the message boxes
// use `user_message()`, which is translated.

use thiserror::Error;

/// Result alias for controller operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing image or malformed user input.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The chosen file could not be decoded as an image.
    #[error("decode error: {0}")]
    Decode(String),

    /// Camera unavailable or no frame returned.
    #[error("device error: {0}")]
    Device(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no image loaded")]
    NoImage,
    #[error("channel name is empty")]
    EmptyChannel,
    #[error("unknown channel {0:?}")]
    UnknownChannel(String),
    #[error("kernel size is missing")]
    MissingKernelSize,
    #[error("kernel size {0} is below 1")]
    KernelTooSmall(i32),
    #[error("kernel size {0} is even")]
    EvenKernelSize(i32),
}

impl AppError {
    /// A missing image is a warning ("load something first"), everything else
    /// is an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, AppError::Validation(ValidationError::NoImage))
    }

    /// Translated text for the message box.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(v) => match v {
                ValidationError::NoImage => t!("error.no_image"),
                ValidationError::EmptyChannel | ValidationError::UnknownChannel(_) => {
                    t!("error.bad_channel")
                }
                ValidationError::MissingKernelSize
                | ValidationError::KernelTooSmall(_)
                | ValidationError::EvenKernelSize(_) => t!("error.bad_kernel"),
            },
            AppError::Decode(detail) => t!("error.decode", detail = detail),
            AppError::Device(detail) => t!("error.device", detail = detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_image_is_a_warning() {
        assert!(AppError::from(ValidationError::NoImage).is_warning());
        assert!(!AppError::from(ValidationError::EvenKernelSize(4)).is_warning());
        assert!(!AppError::Decode("bad header".into()).is_warning());
        assert!(!AppError::Device("busy".into()).is_warning());
    }

    #[test]
    fn display_carries_the_detail() {
        let err = AppError::from(ValidationError::UnknownChannel("X".into()));
        assert_eq!(err.to_string(), "validation error: unknown channel \"X\"");
        let err = AppError::Device("/dev/video0: no such device".into());
        assert!(err.to_string().contains("/dev/video0"));
    }
}
