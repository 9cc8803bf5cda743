//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Stats Service Defaults
// ============================================================================

/// Default Xray API host.
pub const DEFAULT_XRAY_API_HOST: &str = "127.0.0.1";
/// Default Xray API port.
pub const DEFAULT_XRAY_API_PORT: u16 = 8080;
/// Default polling schedule (every 5 minutes).
pub const DEFAULT_STATS_CRON: &str = "*/5 * * * *";
/// Default stats RPC timeout in seconds.
pub const DEFAULT_STATS_TIMEOUT_SECS: u64 = 10;
/// Reset counters server-side after each scheduled read.
pub const DEFAULT_STATS_RESET: bool = true;

// ============================================================================
// Ingestion Defaults
// ============================================================================

/// Default Xray access log path.
pub const DEFAULT_LOG_PATH: &str = "/var/log/xray/access.log";
/// Default event queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 300;
/// Default mirror export batch size.
pub const DEFAULT_BATCH_SIZE: usize = 10;
/// Default sleep between reads once the tailer hits end-of-file.
pub const DEFAULT_TAIL_POLL_INTERVAL_MS: u64 = 1000;

/// Source addresses treated as noise besides loopback (public resolvers).
pub const FILTERED_SOURCE_IPS: &[&str] = &["1.1.1.1", "8.8.8.8"];

// ============================================================================
// Mirror Defaults
// ============================================================================

/// Default mirror HTTP request timeout in seconds.
pub const DEFAULT_MIRROR_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Database Defaults
// ============================================================================

/// Default database URL (SQLite file next to the binary, created on demand).
pub const DEFAULT_DATABASE_URL: &str = "sqlite://xtally.db?mode=rwc";
/// Default maximum pool connections.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
/// Default pool acquire timeout in seconds.
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Formats
// ============================================================================

/// Timestamp layout used by the Xray access log.
pub const LOG_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
/// Bucket date layout.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Bucket hour layout.
pub const HOUR_FORMAT: &str = "%H:%M";
/// Date-time layout for stored and exported events.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Compact date layout accepted by the report command.
pub const REPORT_DATE_FORMAT: &str = "%Y%m%d";
