//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use radium_core::domain::QueueError;
use radium_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const FORBIDDEN: i32 = 4004;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const COLLABORATOR_ERROR: i32 = 5003;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::NotFound(msg) => ErrorObjectOwned::owned(code::NOT_FOUND, msg, None::<()>),
        AppError::Forbidden(msg) => ErrorObjectOwned::owned(code::FORBIDDEN, msg, None::<()>),
        AppError::Queue(e @ QueueError::NotFound(_)) => {
            ErrorObjectOwned::owned(code::NOT_FOUND, e.to_string(), None::<()>)
        }
        AppError::Queue(e @ QueueError::InvalidSettings { .. }) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Join(e) => ErrorObjectOwned::owned(code::CONFLICT, e.to_string(), Some(e)),
        AppError::Collaborator(e) => {
            ErrorObjectOwned::owned(code::COLLABORATOR_ERROR, e.to_string(), None::<()>)
        }
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Io(e) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, e.to_string(), None::<()>),
        AppError::Config(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
        AppError::Internal(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}
