//! SQL statements for each supported database.
//!
//! PostgreSQL uses numbered placeholders and needs `user` quoted; MySQL and
//! SQLite share the `?` form. Buckets are unique per `(user, date, time)` and
//! `add_usage` is a single upsert statement against that key.

use super::backend::DatabaseType;

/// Statement set for one database flavour.
pub(crate) struct Queries {
    pub schema: &'static [&'static str],
    pub insert_event: &'static str,
    pub find_usage: &'static str,
    pub insert_usage: &'static str,
    pub update_usage: &'static str,
    pub add_usage: &'static str,
    pub daily_usage: &'static str,
}

pub(crate) fn for_database(db_type: DatabaseType) -> &'static Queries {
    match db_type {
        DatabaseType::PostgreSQL => &POSTGRES,
        DatabaseType::MySQL => &MYSQL,
        DatabaseType::SQLite => &SQLITE,
    }
}

// ============================================================================
// SQLite
// ============================================================================

const SQLITE_SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS xray_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user TEXT NOT NULL,
    ip TEXT NOT NULL,
    target TEXT NOT NULL,
    inbound TEXT NOT NULL,
    outbound TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    server TEXT NOT NULL DEFAULT ''
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS xray_user_stats (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user TEXT NOT NULL,
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    down INTEGER NOT NULL DEFAULT 0,
    up INTEGER NOT NULL DEFAULT 0
)
"#,
    r#"
CREATE UNIQUE INDEX IF NOT EXISTS uq_xray_user_stats_bucket
ON xray_user_stats (user, date, time)
"#,
];

static SQLITE: Queries = Queries {
    schema: SQLITE_SCHEMA,
    insert_event: QM_INSERT_EVENT,
    find_usage: QM_FIND_USAGE,
    insert_usage: QM_INSERT_USAGE,
    update_usage: QM_UPDATE_USAGE,
    add_usage: r#"
INSERT INTO xray_user_stats (user, date, time, down, up)
VALUES (?, ?, ?, ?, ?)
ON CONFLICT (user, date, time)
DO UPDATE SET down = down + excluded.down, up = up + excluded.up
"#,
    daily_usage: QM_DAILY_USAGE,
};

// ============================================================================
// MySQL
// ============================================================================

// MySQL cannot index unbounded TEXT and has no `CREATE INDEX IF NOT EXISTS`,
// so the unique key lives in the table definition.
const MYSQL_SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS xray_log (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    user VARCHAR(255) NOT NULL,
    ip VARCHAR(64) NOT NULL,
    target VARCHAR(512) NOT NULL,
    inbound VARCHAR(255) NOT NULL,
    outbound VARCHAR(255) NOT NULL,
    timestamp VARCHAR(19) NOT NULL,
    server VARCHAR(255) NOT NULL DEFAULT ''
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS xray_user_stats (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    user VARCHAR(255) NOT NULL,
    date VARCHAR(10) NOT NULL,
    time VARCHAR(5) NOT NULL,
    down BIGINT NOT NULL DEFAULT 0,
    up BIGINT NOT NULL DEFAULT 0,
    UNIQUE KEY uq_xray_user_stats_bucket (user, date, time)
)
"#,
];

static MYSQL: Queries = Queries {
    schema: MYSQL_SCHEMA,
    insert_event: QM_INSERT_EVENT,
    find_usage: QM_FIND_USAGE,
    insert_usage: QM_INSERT_USAGE,
    update_usage: QM_UPDATE_USAGE,
    add_usage: r#"
INSERT INTO xray_user_stats (user, date, time, down, up)
VALUES (?, ?, ?, ?, ?)
ON DUPLICATE KEY UPDATE down = down + VALUES(down), up = up + VALUES(up)
"#,
    daily_usage: QM_DAILY_USAGE,
};

// Shared by MySQL and SQLite.

const QM_INSERT_EVENT: &str = r#"
INSERT INTO xray_log (user, ip, target, inbound, outbound, timestamp, server)
VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

const QM_FIND_USAGE: &str = r#"
SELECT user, date, time, down, up
FROM xray_user_stats
WHERE user = ? AND date = ? AND time = ?
"#;

const QM_INSERT_USAGE: &str = r#"
INSERT INTO xray_user_stats (user, date, time, down, up)
VALUES (?, ?, ?, ?, ?)
"#;

const QM_UPDATE_USAGE: &str = r#"
UPDATE xray_user_stats
SET down = ?, up = ?
WHERE user = ? AND date = ? AND time = ?
"#;

const QM_DAILY_USAGE: &str = r#"
SELECT user, date, time, down, up
FROM xray_user_stats
WHERE date = ?
ORDER BY time, user
"#;

// ============================================================================
// PostgreSQL
// ============================================================================

const POSTGRES_SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS xray_log (
    id BIGSERIAL PRIMARY KEY,
    "user" TEXT NOT NULL,
    ip TEXT NOT NULL,
    target TEXT NOT NULL,
    inbound TEXT NOT NULL,
    outbound TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    server TEXT NOT NULL DEFAULT ''
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS xray_user_stats (
    id BIGSERIAL PRIMARY KEY,
    "user" TEXT NOT NULL,
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    down BIGINT NOT NULL DEFAULT 0,
    up BIGINT NOT NULL DEFAULT 0
)
"#,
    r#"
CREATE UNIQUE INDEX IF NOT EXISTS uq_xray_user_stats_bucket
ON xray_user_stats ("user", date, time)
"#,
];

static POSTGRES: Queries = Queries {
    schema: POSTGRES_SCHEMA,
    insert_event: r#"
INSERT INTO xray_log ("user", ip, target, inbound, outbound, timestamp, server)
VALUES ($1, $2, $3, $4, $5, $6, $7)
"#,
    find_usage: r#"
SELECT "user", date, time, down, up
FROM xray_user_stats
WHERE "user" = $1 AND date = $2 AND time = $3
"#,
    insert_usage: r#"
INSERT INTO xray_user_stats ("user", date, time, down, up)
VALUES ($1, $2, $3, $4, $5)
"#,
    update_usage: r#"
UPDATE xray_user_stats
SET down = $1, up = $2
WHERE "user" = $3 AND date = $4 AND time = $5
"#,
    add_usage: r#"
INSERT INTO xray_user_stats ("user", date, time, down, up)
VALUES ($1, $2, $3, $4, $5)
ON CONFLICT ("user", date, time)
DO UPDATE SET down = xray_user_stats.down + EXCLUDED.down,
              up = xray_user_stats.up + EXCLUDED.up
"#,
    daily_usage: r#"
SELECT "user", date, time, down, up
FROM xray_user_stats
WHERE date = $1
ORDER BY time, "user"
"#,
};
