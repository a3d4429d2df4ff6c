//! Nagios-compatible block-device I/O check.
//!
//! Samples block-device statistics through the external `iostat` utility,
//! compares one metric family against warning/critical thresholds and
//! renders a single status line for the monitoring scheduler.
//!
//! The pipeline is strictly linear:
//!
//! ```text
//! Args ──▶ CheckConfig ──▶ IostatCollector ──▶ MetricSet ──▶ evaluate ──▶ render
//!          (config)        (collector)         (metrics)     (threshold)  (report)
//! ```
//!
//! Each invocation is independent and stateless: nothing outlives the
//! process, and the monitoring scheduler drives retries on its own cadence.

pub mod collector;
pub mod config;
pub mod metrics;
pub mod report;
pub mod threshold;

pub use collector::{CollectError, DeviceSample, IostatCollector};
pub use config::{CheckConfig, ConfigError};
pub use metrics::{MetricSet, Mode};
pub use report::render;
pub use threshold::{EvaluationResult, Status, ThresholdSet, evaluate};
