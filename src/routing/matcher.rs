//! Route matching module
//!
//! Decides which of the three outcomes a request path maps to.

use super::table::{RouteTable, ScriptRoute};

/// Dispatch decision for a request path
#[derive(Debug, PartialEq, Eq)]
pub enum RouteMatch<'a> {
    /// Root path: serve usage help
    Help,
    /// Known script path
    Script(&'a ScriptRoute),
    /// Anything else
    NotFound,
}

/// Root is `/` or the empty path
pub fn is_help_path(path: &str) -> bool {
    path.is_empty() || path == "/"
}

/// Match a path in priority order: help, script, not found
pub fn match_route<'a>(path: &str, table: &'a RouteTable) -> RouteMatch<'a> {
    if is_help_path(path) {
        return RouteMatch::Help;
    }
    table
        .get(path)
        .map_or(RouteMatch::NotFound, RouteMatch::Script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_help_paths() {
        let table = RouteTable::new(&Config::defaults().unwrap().routes);
        assert_eq!(match_route("", &table), RouteMatch::Help);
        assert_eq!(match_route("/", &table), RouteMatch::Help);
        assert_ne!(match_route("//", &table), RouteMatch::Help);
    }

    #[test]
    fn test_script_paths() {
        let table = RouteTable::new(&Config::defaults().unwrap().routes);
        match match_route("/rog", &table) {
            RouteMatch::Script(route) => assert_eq!(route.label, "ROG Ally X (Windows)"),
            other => panic!("expected script route, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_paths() {
        let table = RouteTable::new(&Config::defaults().unwrap().routes);
        for path in ["/deck/", "/Deck", "/favicon.ico", "/targets/deck.sh"] {
            assert_eq!(match_route(path, &table), RouteMatch::NotFound, "{path}");
        }
    }
}
