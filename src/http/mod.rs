//! HTTP protocol layer module
//!
//! Response builders, MIME detection, and the fixed injected header set,
//! decoupled from path resolution and routing.

pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_500_response, build_501_response, build_dir_redirect_response,
    build_file_response, build_listing_response, build_options_response,
};
