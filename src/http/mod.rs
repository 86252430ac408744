//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! static file lookup itself.

pub mod cache;
pub mod headers;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used types
pub use headers::apply_fixed_headers;
pub use path::SafePath;
pub use response::{
    build_301_response, build_304_response, build_404_response, build_405_response,
    build_500_response, build_file_response,
};
