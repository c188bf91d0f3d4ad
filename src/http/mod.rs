//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from specific business logic.

pub mod cache;
pub mod negotiate;
pub mod response;

// Re-export commonly used types
pub use cache::CachePolicy;
pub use negotiate::is_browser;
pub use response::{
    build_404_response, build_405_response, build_502_response, build_help_response,
    build_options_response, build_script_response,
};
