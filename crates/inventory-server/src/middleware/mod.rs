//! Tower middleware for the HTTP stack.

pub mod cors;
pub mod request_id;
pub mod trace;
