//! Request handler module
//!
//! Responsible for request routing dispatch and the two content handlers:
//! the video stream under the configured prefix and the static file tree
//! for everything else.

pub mod dir_listing;
pub mod resolve;
pub mod router;
pub mod static_files;
pub mod video;

// Re-export main entry point
pub use router::{handle_request, RequestContext};
