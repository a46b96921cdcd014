//! Process-wide configuration for the pixel cache, resolved once from
//! environment variables.
//!
//! Stands in for the policy-file lookups the original system performs;
//! this crate only consumes the handful of keys named below, read through
//! `MAGICK_*` environment overrides the same way the upstream tool does.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default network port for the remote cache transport.
pub const DEFAULT_PORT: u16 = 6668;

/// Default pending-connection backlog for the remote cache server.
pub const DEFAULT_BACKLOG: i32 = 10;

/// Resolved resource ceilings and remote-mode settings.
///
/// Constructed once via [`CacheConfig::from_env`] and shared (typically
/// behind an `Arc`) across every descriptor in a process.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Ceiling on total reserved area (columns*rows, in pixels) across all caches.
    pub area_limit: u64,
    /// Ceiling on anonymous/heap memory tier bytes.
    pub memory_limit: u64,
    /// Ceiling on file-mapped tier bytes.
    pub map_limit: u64,
    /// Ceiling on disk tier bytes.
    pub disk_limit: u64,
    /// Ceiling on concurrently open disk file descriptors.
    pub file_limit: u64,
    /// Ceiling on worker threads the resource governor will admit.
    pub thread_limit: u64,
    /// Wall-clock ceiling from first cache acquisition; exceeding it is fatal.
    pub time_limit: Option<Duration>,
    /// Milliseconds to sleep every 32nd cache acquisition.
    pub throttle: Duration,
    /// Shared secret required to operate in remote mode.
    pub shared_secret: Option<String>,
    /// Round-robin `host:port` list for the remote client.
    pub cache_hosts: Vec<(String, u16)>,
    /// Directory used for temp-file backing, overriding every env var below.
    pub temporary_path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            area_limit: u64::MAX,
            memory_limit: 1 << 30,
            map_limit: 1 << 30,
            disk_limit: u64::MAX,
            file_limit: 768,
            thread_limit: u64::MAX,
            time_limit: None,
            throttle: Duration::from_millis(0),
            shared_secret: None,
            cache_hosts: Vec::new(),
            temporary_path: None,
        }
    }
}

impl CacheConfig {
    /// Resolves configuration from `MAGICK_*` environment variables, falling
    /// back to [`CacheConfig::default`] for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            area_limit: env_size("MAGICK_AREA_LIMIT").unwrap_or(defaults.area_limit),
            memory_limit: env_size("MAGICK_MEMORY_LIMIT").unwrap_or(defaults.memory_limit),
            map_limit: env_size("MAGICK_MAP_LIMIT").unwrap_or(defaults.map_limit),
            disk_limit: env_size("MAGICK_DISK_LIMIT").unwrap_or(defaults.disk_limit),
            file_limit: env_size("MAGICK_FILE_LIMIT").unwrap_or(defaults.file_limit),
            thread_limit: env_size("MAGICK_THREAD_LIMIT").unwrap_or(defaults.thread_limit),
            time_limit: env_size("MAGICK_TIME_LIMIT").map(Duration::from_secs),
            throttle: env_size("MAGICK_THROTTLE")
                .map(Duration::from_millis)
                .unwrap_or(defaults.throttle),
            shared_secret: env::var("MAGICK_SHARED_SECRET").ok(),
            cache_hosts: env::var("MAGICK_CACHE_HOSTS")
                .ok()
                .map(|v| parse_hosts(&v))
                .unwrap_or_default(),
            temporary_path: temporary_path_from_env(),
        }
    }
}

/// Picks the temp-file directory, honouring the precedence spec.md §6 gives:
/// `MAGICK_TEMPORARY_PATH`, then `MAGICK_TMPDIR`, `TMP`, `TEMP`, `TMPDIR`,
/// then the platform default.
fn temporary_path_from_env() -> Option<PathBuf> {
    for key in ["MAGICK_TEMPORARY_PATH", "MAGICK_TMPDIR", "TMP", "TEMP", "TMPDIR"] {
        if let Ok(val) = env::var(key) {
            if !val.is_empty() {
                return Some(PathBuf::from(val));
            }
        }
    }
    None
}

/// Parses a `host[:port]`, `host[:port]`, ... list into `(host, port)` pairs,
/// defaulting the port to [`DEFAULT_PORT`].
fn parse_hosts(spec: &str) -> Vec<(String, u16)> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| match entry.rsplit_once(':') {
            Some((host, port)) => port
                .parse::<u16>()
                .map(|p| (host.to_string(), p))
                .unwrap_or_else(|_| (entry.to_string(), DEFAULT_PORT)),
            None => (entry.to_string(), DEFAULT_PORT),
        })
        .collect()
}

/// Reads an environment variable and parses it as a size with an optional
/// `K`/`M`/`G`/`T` suffix (binary, 1024-based, matching the original's
/// `ParseMagickSizeOption`). Plain digits are bytes.
fn env_size(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|v| parse_size(&v))
}

/// Parses a decimal number with an optional size suffix into a byte count.
///
/// `"512"` → 512, `"64K"` → 65536, `"2M"` → 2097152, `"1G"` → 1073741824.
/// Case-insensitive; a trailing `B` (e.g. `"64KB"`) is tolerated.
pub fn parse_size(input: &str) -> Option<u64> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    let mut chars = s.chars().peekable();
    let mut digits = String::new();
    for c in chars.by_ref() {
        if c.is_ascii_digit() || c == '.' {
            digits.push(c);
        } else {
            break;
        }
    }
    let value: f64 = digits.parse().ok()?;
    let suffix: String = s[digits.len()..].trim().to_ascii_uppercase();
    let suffix = suffix.strip_suffix('B').unwrap_or(&suffix);
    let multiplier: u64 = match suffix {
        "" => 1,
        "K" => 1 << 10,
        "M" => 1 << 20,
        "G" => 1 << 30,
        "T" => 1 << 40,
        _ => return None,
    };
    Some((value * multiplier as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_bytes() {
        assert_eq!(parse_size("512"), Some(512));
    }

    #[test]
    fn parses_binary_suffixes() {
        assert_eq!(parse_size("64K"), Some(64 * 1024));
        assert_eq!(parse_size("2M"), Some(2 * 1024 * 1024));
        assert_eq!(parse_size("1G"), Some(1024 * 1024 * 1024));
        assert_eq!(parse_size("1GB"), Some(1024 * 1024 * 1024));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_size("not-a-size"), None);
        assert_eq!(parse_size(""), None);
    }

    #[test]
    fn parses_host_list() {
        let hosts = parse_hosts("render01:6668, render02, 10.0.0.4:7000");
        assert_eq!(
            hosts,
            vec![
                ("render01".to_string(), 6668),
                ("render02".to_string(), DEFAULT_PORT),
                ("10.0.0.4".to_string(), 7000),
            ]
        );
    }
}
