//! Routing module
//!
//! Fixed route table and path matching.

pub mod matcher;
pub mod table;

pub use matcher::{match_route, RouteMatch};
pub use table::{RouteTable, ScriptRoute};
