//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `xtally_core::defaults`.

use xtally_core::defaults;

/// Generate default value functions that forward to xtally_core::defaults constants.
macro_rules! default_fns {
    // For Copy types (integers, bool, etc.)
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_api_port              => DEFAULT_XRAY_API_PORT: u16,
    default_stats_timeout_secs    => DEFAULT_STATS_TIMEOUT_SECS: u64,
    default_reset_counters        => DEFAULT_STATS_RESET: bool,
    default_queue_capacity        => DEFAULT_QUEUE_CAPACITY: usize,
    default_batch_size            => DEFAULT_BATCH_SIZE: usize,
    default_poll_interval_ms      => DEFAULT_TAIL_POLL_INTERVAL_MS: u64,
    default_mirror_timeout_secs   => DEFAULT_MIRROR_TIMEOUT_SECS: u64,
    default_max_connections       => DEFAULT_DB_MAX_CONNECTIONS: u32,
    default_acquire_timeout_secs  => DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64,
}

default_string_fns! {
    default_api_host      => DEFAULT_XRAY_API_HOST,
    default_stats_cron    => DEFAULT_STATS_CRON,
    default_log_path      => DEFAULT_LOG_PATH,
    default_database_url  => DEFAULT_DATABASE_URL,
}

pub(crate) fn default_true() -> bool {
    true
}
