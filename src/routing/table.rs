//! Route table module
//!
//! Immutable path -> script mapping, built once from configuration.

use std::collections::HashMap;

use crate::config::{RouteEntry, Shell};

/// A script the router proxies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRoute {
    pub path: String,
    pub script: String,
    pub label: String,
    pub title: String,
    pub shell: Shell,
}

impl ScriptRoute {
    /// Fully-qualified upstream URL for this script
    pub fn upstream_url(&self, base_url: &str) -> String {
        format!("{base_url}{}", self.script)
    }

    /// Shell one-liner that installs this script from `public_url`
    pub fn usage(&self, public_url: &str) -> String {
        self.shell
            .invocation(&format!("{}{}", public_url.trim_end_matches('/'), self.path))
    }
}

impl From<&RouteEntry> for ScriptRoute {
    fn from(entry: &RouteEntry) -> Self {
        Self {
            path: entry.path.clone(),
            script: entry.script.clone(),
            label: entry.label.clone(),
            title: entry.title.clone(),
            shell: entry.shell,
        }
    }
}

/// Route table, keeping declaration order for help output
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<ScriptRoute>,
    index: HashMap<String, usize>,
}

impl RouteTable {
    pub fn new(entries: &[RouteEntry]) -> Self {
        let routes: Vec<ScriptRoute> = entries.iter().map(ScriptRoute::from).collect();
        let index = routes
            .iter()
            .enumerate()
            .map(|(i, r)| (r.path.clone(), i))
            .collect();
        Self { routes, index }
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, path: &str) -> Option<&ScriptRoute> {
        self.index.get(path).map(|&i| &self.routes[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScriptRoute> {
        self.routes.iter()
    }

    /// Human-readable list of known paths: "/a", "/a or /b", "/a, /b or /c"
    pub fn known_paths(&self) -> String {
        let paths: Vec<&str> = self.routes.iter().map(|r| r.path.as_str()).collect();
        match paths.split_last() {
            None => String::new(),
            Some((last, [])) => (*last).to_string(),
            Some((last, rest)) => format!("{} or {last}", rest.join(", ")),
        }
    }
}
