//! Request handler module
//!
//! Responsible for request routing dispatch: help pages, script proxying and 404s.

pub mod help;
pub mod router;
pub mod script;

// Re-export main entry point
pub use help::HelpPages;
pub use router::handle_request;
