//! Current time tool definition.

use chrono::{DateTime, FixedOffset, Utc};
use rmcp::handler::server::tool::cached_schema_for_type;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::core::config::ToolsConfig;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::ToolHandler;
use crate::domains::tools::schema::{Arguments, ParamSpec, ParamType, ToolDescriptor};

/// Current time rendered in a fixed UTC offset.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TimeOutput {
    /// RFC 3339 timestamp, e.g. `2024-03-01T21:30:00+09:00`.
    pub iso8601: String,
    /// Human readable, e.g. `2024-03-01 21:30:00 +09:00`.
    pub formatted: String,
    /// Normalized offset, e.g. `+09:00`.
    pub utc_offset: String,
    /// Seconds since the Unix epoch.
    pub unix: i64,
}

/// Parse a UTC offset.
///
/// Accepts `UTC`, `Z`, `GMT`, `+09:00`, `-0530`, `+9` and the same forms
/// prefixed with `UTC` (`UTC+9`). Offsets beyond ±23:59 are rejected.
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let s = raw.trim();
    if s.eq_ignore_ascii_case("utc") || s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("gmt") {
        return FixedOffset::east_opt(0);
    }

    let s = match s.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("utc") || prefix.eq_ignore_ascii_case("gmt") => &s[3..],
        _ => s,
    };

    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };

    if hours.is_empty()
        || hours.len() > 2
        || minutes.is_empty()
        || minutes.len() > 2
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Render `now` in `offset`.
pub fn format_time(now: DateTime<Utc>, offset: FixedOffset) -> TimeOutput {
    let local = now.with_timezone(&offset);
    TimeOutput {
        iso8601: local.to_rfc3339(),
        formatted: local.format("%Y-%m-%d %H:%M:%S %:z").to_string(),
        utc_offset: local.format("%:z").to_string(),
        unix: now.timestamp(),
    }
}

/// Time tool - reports the current time in a UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct TimeTool {
    default_offset: FixedOffset,
}

impl TimeTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "time_tool";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get the current date and time. Optionally pass a UTC offset \
         such as \"+09:00\", \"-0530\", \"+9\" or \"UTC\".";

    pub fn new(default_offset: FixedOffset) -> Self {
        Self { default_offset }
    }

    /// Build the tool from configuration. Fails if the configured default
    /// offset does not parse.
    pub fn from_config(config: &ToolsConfig) -> Result<Self, ToolError> {
        let offset = parse_utc_offset(&config.default_utc_offset).ok_or_else(|| {
            ToolError::invalid_argument(
                "utc_offset",
                format!("configured default '{}' is not a valid UTC offset", config.default_utc_offset),
            )
        })?;
        Ok(Self::new(offset))
    }

    pub fn descriptor(config: &ToolsConfig) -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION)
            .param(
                ParamSpec::optional("utc_offset", ParamType::String, "UTC offset, e.g. \"+09:00\" or \"UTC\"")
                    .with_default(config.default_utc_offset.clone()),
            )
            .with_output_schema(cached_schema_for_type::<TimeOutput>())
    }

    /// Execute the tool logic against the system clock.
    #[instrument(skip(self))]
    pub fn execute(&self, utc_offset: Option<&str>) -> Result<TimeOutput, ToolError> {
        info!("Time tool called");

        let offset = match utc_offset {
            Some(raw) => parse_utc_offset(raw).ok_or_else(|| {
                ToolError::invalid_argument(
                    "utc_offset",
                    format!("'{}' is not a valid UTC offset (expected e.g. +09:00, -0530, UTC)", raw),
                )
            })?,
            None => self.default_offset,
        };

        Ok(format_time(Utc::now(), offset))
    }
}

impl ToolHandler for TimeTool {
    fn call(&self, args: &Arguments) -> Result<Value, ToolError> {
        let output = self.execute(args.opt_str("utc_offset")?)?;
        serde_json::to_value(output).map_err(|e| ToolError::handler(e.to_string()))
    }
}
