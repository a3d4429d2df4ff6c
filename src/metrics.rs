//! Mode selection and metric extraction from collected report rows.
//!
//! Each mode owns a fixed, ordered metric table; the order defines the
//! threshold slots, the status-line layout and the performance-data
//! layout all at once.

use crate::collector::DeviceSample;
use crate::collector::parser::ExtendedRow;

/// The metric family checked by one invocation. Exactly one is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Transfers and kilobytes per second (`-i`).
    Throughput,
    /// Queue depth and request sizes (`-q`).
    Queue,
    /// Request wait times and device utilization (`-W`).
    Wait,
}

/// One metric of a mode: the status-line label and the perfdata name.
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub label: &'static str,
    pub perf_name: &'static str,
}

const THROUGHPUT_METRICS: [MetricDef; 5] = [
    MetricDef {
        label: "Transfers/Sec",
        perf_name: "total_io_sec",
    },
    MetricDef {
        label: "Reads/Sec",
        perf_name: "reads_sec",
    },
    MetricDef {
        label: "Writes/Sec",
        perf_name: "writes_sec",
    },
    MetricDef {
        label: "KB-Read/Sec",
        perf_name: "kb_read_sec",
    },
    MetricDef {
        label: "KB-Written/Sec",
        perf_name: "kb_written_sec",
    },
];

const QUEUE_METRICS: [MetricDef; 4] = [
    MetricDef {
        label: "Queue-Length",
        perf_name: "queue_length",
    },
    MetricDef {
        label: "Avg-Request-KB",
        perf_name: "avg_request_kb",
    },
    MetricDef {
        label: "Avg-Read-Request-KB",
        perf_name: "avg_read_request_kb",
    },
    MetricDef {
        label: "Avg-Write-Request-KB",
        perf_name: "avg_write_request_kb",
    },
];

const WAIT_METRICS: [MetricDef; 4] = [
    MetricDef {
        label: "Avg-Read-Wait-Ms",
        perf_name: "avg_read_wait_ms",
    },
    MetricDef {
        label: "Avg-Write-Wait-Ms",
        perf_name: "avg_write_wait_ms",
    },
    MetricDef {
        label: "Avg-Service-Time-Ms",
        perf_name: "avg_service_time_ms",
    },
    MetricDef {
        label: "Utilization-Pct",
        perf_name: "util_pct",
    },
];

impl Mode {
    /// Status-line heading for the mode.
    pub fn heading(&self) -> &'static str {
        match self {
            Mode::Throughput => "I/O stats:",
            Mode::Queue => "Queue stats:",
            Mode::Wait => "Wait stats:",
        }
    }

    /// The mode's metrics in threshold-slot order.
    pub fn metric_defs(&self) -> &'static [MetricDef] {
        match self {
            Mode::Throughput => &THROUGHPUT_METRICS,
            Mode::Queue => &QUEUE_METRICS,
            Mode::Wait => &WAIT_METRICS,
        }
    }

    pub fn metric_count(&self) -> usize {
        self.metric_defs().len()
    }
}

/// The selected mode's metric values, parallel to [`Mode::metric_defs`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSet {
    pub mode: Mode,
    pub values: Vec<f64>,
}

impl MetricSet {
    /// Extracts the mode's metrics from a collected sample.
    pub fn from_sample(mode: Mode, sample: &DeviceSample) -> Self {
        let ext = &sample.extended;
        let values = match mode {
            Mode::Throughput => vec![
                sample.basic.tps,
                ext.reads_sec,
                ext.writes_sec,
                ext.kb_read_sec,
                ext.kb_written_sec,
            ],
            Mode::Queue => vec![
                ext.queue_len,
                combined_request_kb(ext),
                ext.read_request_kb,
                ext.write_request_kb,
            ],
            Mode::Wait => vec![
                ext.read_await_ms,
                ext.write_await_ms,
                ext.service_time_ms,
                ext.util_pct,
            ],
        };
        Self { mode, values }
    }
}

/// Combined average request size in kilobytes.
///
/// The provider dropped the combined column when it split request sizes
/// by direction, so it is reconstructed as the IOPS-weighted mean of the
/// per-direction averages. Zero for an idle device.
fn combined_request_kb(row: &ExtendedRow) -> f64 {
    let iops = row.reads_sec + row.writes_sec;
    if iops == 0.0 {
        return 0.0;
    }
    (row.read_request_kb * row.reads_sec + row.write_request_kb * row.writes_sec) / iops
}
