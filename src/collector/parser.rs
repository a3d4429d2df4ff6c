//! Parsers for `iostat` report output.
//!
//! These are pure functions that parse the captured stdout of the
//! statistics provider into structured rows. They are designed to be
//! easily testable with string inputs.
//!
//! Field positions are tied to the provider's column layout, which has
//! drifted between sysstat generations. Each report type therefore gets a
//! versioned layout table; a future format change is a new table, not a
//! parser rewrite.

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "report parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Column indices of the extended device report (`iostat -d -k -x`).
#[derive(Debug, Clone, Copy)]
pub struct ExtendedLayout {
    pub reads_sec: usize,
    pub writes_sec: usize,
    pub kb_read_sec: usize,
    pub kb_written_sec: usize,
    pub read_await_ms: usize,
    pub write_await_ms: usize,
    pub queue_len: usize,
    pub read_request_kb: usize,
    pub write_request_kb: usize,
    pub service_time_ms: usize,
    pub util_pct: usize,
}

/// sysstat 11.6 extended columns:
/// `Device r/s w/s rkB/s wkB/s rrqm/s wrqm/s %rrqm %wrqm r_await w_await aqu-sz rareq-sz wareq-sz svctm %util`
pub const EXTENDED_V1: ExtendedLayout = ExtendedLayout {
    reads_sec: 1,
    writes_sec: 2,
    kb_read_sec: 3,
    kb_written_sec: 4,
    read_await_ms: 9,
    write_await_ms: 10,
    queue_len: 11,
    read_request_kb: 12,
    write_request_kb: 13,
    service_time_ms: 14,
    util_pct: 15,
};

/// Column indices of the basic device report (`iostat -d -k`).
#[derive(Debug, Clone, Copy)]
pub struct BasicLayout {
    pub tps: usize,
    pub kb_read_sec: usize,
    pub kb_written_sec: usize,
}

/// `Device tps kB_read/s kB_wrtn/s kB_read kB_wrtn`
pub const BASIC_V1: BasicLayout = BasicLayout {
    tps: 1,
    kb_read_sec: 2,
    kb_written_sec: 3,
};

/// Parsed row from the extended device report. All rates are per second,
/// sizes in kilobytes, waits in milliseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendedRow {
    pub reads_sec: f64,
    pub writes_sec: f64,
    pub kb_read_sec: f64,
    pub kb_written_sec: f64,
    pub read_await_ms: f64,
    pub write_await_ms: f64,
    pub queue_len: f64,
    pub read_request_kb: f64,
    pub write_request_kb: f64,
    pub service_time_ms: f64,
    pub util_pct: f64,
}

/// Parsed row from the basic device report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicRow {
    pub tps: f64,
    pub kb_read_sec: f64,
    pub kb_written_sec: f64,
}

/// Rewrites a decimal comma to a period.
///
/// Some locales render the provider's numbers as "12,34"; comparisons and
/// output must treat that identically to "12.34".
pub fn normalize_decimal(field: &str) -> String {
    field.replace(',', ".")
}

fn parse_field(parts: &[&str], idx: usize, name: &str) -> Result<f64, ParseError> {
    let raw = parts
        .get(idx)
        .ok_or_else(|| ParseError::new(format!("missing field {}", name)))?;
    normalize_decimal(raw)
        .parse()
        .map_err(|_| ParseError::new(format!("invalid {}: '{}'", name, raw)))
}

/// Returns the last report row for `device`.
///
/// Windowed runs print two report blocks; the first is the cumulative
/// since-boot average and must be discarded, so the last matching row is
/// always the one to keep.
fn last_device_row<'a>(content: &'a str, device: &str) -> Option<Vec<&'a str>> {
    let mut row = None;
    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.first() == Some(&device) {
            row = Some(parts);
        }
    }
    row
}

/// Parses the extended device report, selecting the last row for `device`.
pub fn parse_extended_report(
    content: &str,
    device: &str,
    layout: &ExtendedLayout,
) -> Result<ExtendedRow, ParseError> {
    let parts = last_device_row(content, device).ok_or_else(|| {
        ParseError::new(format!("no extended report row for device '{}'", device))
    })?;

    Ok(ExtendedRow {
        reads_sec: parse_field(&parts, layout.reads_sec, "r/s")?,
        writes_sec: parse_field(&parts, layout.writes_sec, "w/s")?,
        kb_read_sec: parse_field(&parts, layout.kb_read_sec, "rkB/s")?,
        kb_written_sec: parse_field(&parts, layout.kb_written_sec, "wkB/s")?,
        read_await_ms: parse_field(&parts, layout.read_await_ms, "r_await")?,
        write_await_ms: parse_field(&parts, layout.write_await_ms, "w_await")?,
        queue_len: parse_field(&parts, layout.queue_len, "aqu-sz")?,
        read_request_kb: parse_field(&parts, layout.read_request_kb, "rareq-sz")?,
        write_request_kb: parse_field(&parts, layout.write_request_kb, "wareq-sz")?,
        service_time_ms: parse_field(&parts, layout.service_time_ms, "svctm")?,
        util_pct: parse_field(&parts, layout.util_pct, "%util")?,
    })
}

/// Parses the basic device report, selecting the last row for `device`.
pub fn parse_basic_report(
    content: &str,
    device: &str,
    layout: &BasicLayout,
) -> Result<BasicRow, ParseError> {
    let parts = last_device_row(content, device)
        .ok_or_else(|| ParseError::new(format!("no report row for device '{}'", device)))?;

    Ok(BasicRow {
        tps: parse_field(&parts, layout.tps, "tps")?,
        kb_read_sec: parse_field(&parts, layout.kb_read_sec, "kB_read/s")?,
        kb_written_sec: parse_field(&parts, layout.kb_written_sec, "kB_wrtn/s")?,
    })
}
