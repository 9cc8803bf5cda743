//! Messages of `xray.app.stats.command.StatsService`.
//!
//! Only the `QueryStats` call is used, so the few messages it needs are
//! declared by hand instead of generated from the `.proto` file.

/// Request for `QueryStats`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryStatsRequest {
    /// Substring filter on counter names. Empty matches all.
    #[prost(string, tag = "1")]
    pub pattern: ::prost::alloc::string::String,
    /// Zero the returned counters after reading.
    #[prost(bool, tag = "2")]
    pub reset: bool,
    #[prost(string, repeated, tag = "3")]
    pub patterns: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(bool, tag = "4")]
    pub regexp: bool,
}

/// One named counter.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Stat {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub value: i64,
}

/// Response of `QueryStats`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryStatsResponse {
    #[prost(message, repeated, tag = "1")]
    pub stat: ::prost::alloc::vec::Vec<Stat>,
}

/// Method path of `QueryStats`.
pub const QUERY_STATS_PATH: &str = "/xray.app.stats.command.StatsService/QueryStats";
