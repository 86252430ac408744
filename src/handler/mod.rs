//! Request handler module
//!
//! Responsible for request dispatch and static file lookup under the
//! serving root.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
