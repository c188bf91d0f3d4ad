//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (JSON structured logging)
//! - Custom patterns with variables

use chrono::Local;

use crate::upstream::CacheStatus;

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Set for script routes only
    pub cache_status: Option<CacheStatus>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

/// Custom format variable names, longer names before their prefixes
const CUSTOM_VARIABLES: &[&str] = &[
    "remote_addr",
    "time_local",
    "time_iso8601",
    "request_time",
    "request_method",
    "request_uri",
    "request",
    "status",
    "body_bytes_sent",
    "http_referer",
    "http_user_agent",
    "cache_status",
];

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            cache_status: None,
            request_time_us: 0,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        self.query.as_ref().map_or_else(
            || self.path.clone(),
            |q| format!("{}?{q}", self.path),
        )
    }

    fn time_local(&self) -> String {
        self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string()
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent "$http_referer" "$http_user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time_local(),
            self.method,
            self.request_uri(),
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        // Manual JSON building to avoid serde dependency for simple case
        let opt = |v: Option<&str>| {
            v.map_or_else(|| "null".to_string(), |s| format!("\"{}\"", escape_json(s)))
        };

        format!(
            r#"{{"remote_addr":"{}","time":"{}","method":"{}","path":"{}","query":{},"http_version":"{}","status":{},"body_bytes":{},"referer":{},"user_agent":{},"cache_status":{},"request_time_us":{}}}"#,
            escape_json(&self.remote_addr),
            self.time.to_rfc3339(),
            escape_json(&self.method),
            escape_json(&self.path),
            opt(self.query.as_deref()),
            escape_json(&self.http_version),
            self.status,
            self.body_bytes,
            opt(self.referer.as_deref()),
            opt(self.user_agent.as_deref()),
            opt(self.cache_status.map(CacheStatus::as_str)),
            self.request_time_us,
        )
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables:
    /// - `$remote_addr` - Client IP address
    /// - `$time_local` - Local time in Common Log Format
    /// - `$time_iso8601` - ISO 8601 timestamp
    /// - `$request` - Full request line ("METHOD /path HTTP/version")
    /// - `$request_method` - HTTP method
    /// - `$request_uri` - Request URI with query string
    /// - `$status` - Response status code
    /// - `$body_bytes_sent` - Response body size
    /// - `$http_referer` - Referer header
    /// - `$http_user_agent` - User-Agent header
    /// - `$cache_status` - HIT or MISS for script routes, `-` otherwise
    /// - `$request_time` - Request processing time in seconds (3 decimal places)
    fn format_custom(&self, pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len() * 2);
        let mut rest = pattern;
        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos + 1..];
            if let Some(name) = CUSTOM_VARIABLES.iter().find(|name| tail.starts_with(**name)) {
                out.push_str(&self.variable(name));
                rest = &tail[name.len()..];
            } else {
                out.push('$');
                rest = tail;
            }
        }
        out.push_str(rest);
        out
    }

    fn variable(&self, name: &str) -> String {
        match name {
            "remote_addr" => self.remote_addr.clone(),
            "time_local" => self.time_local(),
            "time_iso8601" => self.time.to_rfc3339(),
            "request_time" => {
                #[allow(clippy::cast_precision_loss)]
                let secs = self.request_time_us as f64 / 1_000_000.0;
                format!("{secs:.3}")
            }
            "request_method" => self.method.clone(),
            "request_uri" => self.request_uri(),
            "request" => format!(
                "{} {} HTTP/{}",
                self.method,
                self.request_uri(),
                self.http_version
            ),
            "status" => self.status.to_string(),
            "body_bytes_sent" => self.body_bytes.to_string(),
            "http_referer" => self.referer.as_deref().unwrap_or("-").to_string(),
            "http_user_agent" => self.user_agent.as_deref().unwrap_or("-").to_string(),
            "cache_status" => self
                .cache_status
                .map_or("-", CacheStatus::as_str)
                .to_string(),
            _ => String::new(),
        }
    }
}

/// Escape special characters for JSON string
fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "192.168.1.1".to_string(),
            "GET".to_string(),
            "/deck".to_string(),
        );
        entry.query = Some("v=2".to_string());
        entry.status = 200;
        entry.body_bytes = 1234;
        entry.user_agent = Some("curl/8.5.0".to_string());
        entry.cache_status = Some(CacheStatus::Hit);
        entry.request_time_us = 1500;
        entry
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format("combined");
        assert!(log.contains("192.168.1.1"));
        assert!(log.contains("\"GET /deck?v=2 HTTP/1.1\" 200 1234"));
        assert!(log.ends_with("\"-\" \"curl/8.5.0\""));
    }

    #[test]
    fn test_format_common() {
        let log = create_test_entry().format("common");
        assert!(log.contains("GET /deck?v=2 HTTP/1.1"));
        assert!(log.ends_with("200 1234"));
        assert!(!log.contains("curl/8.5.0"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format("json");
        assert!(log.contains(r#""remote_addr":"192.168.1.1""#));
        assert!(log.contains(r#""status":200"#));
        assert!(log.contains(r#""referer":null"#));
        assert!(log.contains(r#""cache_status":"HIT""#));
    }

    #[test]
    fn test_format_custom() {
        let log = create_test_entry().format("$request_method $request_uri $status $cache_status $request_time");
        assert_eq!(log, "GET /deck?v=2 200 HIT 0.002");
    }

    #[test]
    fn test_custom_without_cache_status() {
        let mut entry = create_test_entry();
        entry.cache_status = None;
        assert_eq!(entry.format("[$cache_status]"), "[-]");
    }

    #[test]
    fn test_custom_values_not_rescanned() {
        let mut entry = create_test_entry();
        entry.path = "/$status".to_string();
        entry.query = None;
        entry.status = 404;
        entry.user_agent = Some("$remote_addr".to_string());
        assert_eq!(
            entry.format("$request_uri $status $http_user_agent"),
            "/$status 404 $remote_addr"
        );
    }

    #[test]
    fn test_custom_full_request_and_unknown() {
        let log = create_test_entry().format("$request $price $");
        assert_eq!(log, "GET /deck?v=2 HTTP/1.1 $price $");
    }

    #[test]
    fn test_escape_json() {
        assert_eq!(escape_json("a\"b\\c\n"), "a\\\"b\\\\c\\n");
    }
}
