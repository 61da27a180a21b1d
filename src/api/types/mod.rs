//! Request and response types shared by the handlers

pub mod error;
pub mod path;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use path::Path;
