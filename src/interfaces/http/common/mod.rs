//! Shared HTTP building blocks

pub mod api_response;
pub mod error;
pub mod validated_json;

pub use api_response::{ApiResponse, PaginatedResponse};
pub use error::{ApiError, ApiResult, INTERNAL_SERVER_ERROR};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
