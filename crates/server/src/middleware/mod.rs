//! Tower layers shared by both server roles.

pub mod request_id;

pub use request_id::{request_id_layers, request_id_of, UuidRequestId, X_REQUEST_ID};
