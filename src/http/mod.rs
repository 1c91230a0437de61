//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from specific
//! business logic: bodies, conditional requests, ranges, MIME types, status
//! responses, and the range-aware content server built from them.

pub mod body;
pub mod conditional;
pub mod content;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use body::ResponseBody;
pub use content::serve_content;
pub use range::parse_range_header;
pub use response::{
    build_400_response, build_403_response, build_404_response, build_405_response,
    build_500_response, build_html_response, build_options_response, build_redirect_response,
    build_text_response,
};
