//! Build metadata
//!
//! `build.rs` bumps a counter on every compile and exports it together with the
//! compile time. Both end up in the startup banner, `service_status` and `/health`.

use serde::Serialize;

pub const BUILD_NUMBER: u64 = match option_env!("EATWISE_BUILD_NUMBER") {
    Some(raw) => match digits_to_u64(raw) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

/// RFC 3339 compile time, or "unknown" outside a cargo build
pub const BUILD_TIMESTAMP: &str = match option_env!("EATWISE_BUILD_TIMESTAMP") {
    Some(ts) => ts,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

const BANNER_RULE: &str = "===============================================";

/// Decimal digits only; `None` for an empty or non-numeric string
const fn digits_to_u64(raw: &str) -> Option<u64> {
    let digits = raw.as_bytes();
    if digits.is_empty() {
        return None;
    }
    let mut value: u64 = 0;
    let mut i = 0;
    while i < digits.len() {
        if !digits[i].is_ascii_digit() {
            return None;
        }
        value = value * 10 + (digits[i] - b'0') as u64;
        i += 1;
    }
    Some(value)
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub description: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
            description: DESCRIPTION,
        }
    }

    /// Banner text for one of the binaries
    pub fn banner(&self, component: &str) -> Vec<String> {
        vec![
            BANNER_RULE.to_string(),
            format!("  EatWise {}", component),
            format!("  Version: {} | Build: {}", self.version, self.build_number),
            format!("  Compiled: {}", self.build_timestamp),
            BANNER_RULE.to_string(),
        ]
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::current()
    }
}

/// Banner goes to stderr; stdout carries the MCP transport
pub fn print_startup_banner(component: &str) {
    for line in BuildInfo::current().banner(component) {
        eprintln!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_to_u64() {
        assert_eq!(digits_to_u64("0"), Some(0));
        assert_eq!(digits_to_u64("1234"), Some(1234));
        assert_eq!(digits_to_u64(""), None);
        assert_eq!(digits_to_u64("12a"), None);
    }

    #[test]
    fn test_current_uses_package_metadata() {
        let info = BuildInfo::current();
        assert_eq!(info.name, "eatwise");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_banner_names_component_and_version() {
        let lines = BuildInfo::current().banner("Record Store");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "  EatWise Record Store");
        assert!(lines[2].contains(VERSION));
    }
}
