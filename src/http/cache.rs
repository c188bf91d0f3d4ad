//! HTTP cache control module
//!
//! Cache-Control policies for outgoing responses.

/// Cache control policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Public(u32),
    /// No cache
    NoCache,
}

impl CachePolicy {
    /// Policy for proxied scripts; a zero TTL means clients must revalidate
    pub const fn for_ttl(ttl: u32) -> Self {
        if ttl == 0 {
            Self::NoCache
        } else {
            Self::Public(ttl)
        }
    }

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public(max_age) => format!("public, max-age={max_age}"),
            Self::NoCache => "no-cache".to_string(),
        }
    }
}
