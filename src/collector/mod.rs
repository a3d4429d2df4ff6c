//! Statistics collection via the external `iostat` utility.
//!
//! The collector shells out to the provider twice per check: once for the
//! extended device report (`-x`) and once for the basic report, which is
//! the only place the transfers-per-second figure appears. In windowed
//! mode each invocation samples `interval 2` and the parser keeps the last
//! report block; the first block is the since-boot average. In since-boot
//! mode the interval/count arguments are dropped and the single cumulative
//! report is used directly.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               IostatCollector                │
//! │   extended report (-d -k -x)  ┌────────────┐ │
//! │   basic report    (-d -k)  ──▶│ parser.rs  │ │
//! │                               └────────────┘ │
//! │              ┌───────────────┐               │
//! │              │ CommandRunner │ (trait)       │
//! │              └───────┬───────┘               │
//! └──────────────────────┼───────────────────────┘
//!                ┌───────┴────────┐
//!         ┌──────▼──────┐  ┌──────▼──────┐
//!         │SystemRunner │  │ test mocks  │
//!         └─────────────┘  └─────────────┘
//! ```

pub mod parser;
pub mod runner;

use std::io;
use std::time::Duration;

use tracing::debug;

pub use parser::ParseError;
pub use runner::{CommandRunner, SystemRunner};

use parser::{BASIC_V1, BasicRow, EXTENDED_V1, ExtendedRow};

/// Error type for collection failures.
#[derive(Debug)]
pub enum CollectError {
    /// The provider could not be spawned, failed, or timed out.
    Provider(io::Error),
    /// The provider's output could not be parsed.
    Parse(ParseError),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Provider(e) => write!(f, "statistics provider: {}", e),
            CollectError::Parse(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CollectError {}

impl From<io::Error> for CollectError {
    fn from(e: io::Error) -> Self {
        CollectError::Provider(e)
    }
}

impl From<ParseError> for CollectError {
    fn from(e: ParseError) -> Self {
        CollectError::Parse(e)
    }
}

/// Both report rows for one device at one sampling point.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSample {
    pub basic: BasicRow,
    pub extended: ExtendedRow,
}

/// Collects device statistics by invoking the provider binary.
pub struct IostatCollector<R: CommandRunner> {
    runner: R,
    program: String,
    interval: Duration,
    since_boot: bool,
}

impl<R: CommandRunner> IostatCollector<R> {
    /// Creates a collector with the default 10-second sampling window.
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
            interval: Duration::from_secs(10),
            since_boot: false,
        }
    }

    /// Sets the live sampling window.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Switches to a single cumulative since-boot report.
    pub fn since_boot(mut self, since_boot: bool) -> Self {
        self.since_boot = since_boot;
        self
    }

    /// Collects the extended and basic report rows for `device`.
    pub fn collect(&self, device: &str) -> Result<DeviceSample, CollectError> {
        let extended_out = self.run_report(device, true)?;
        let extended = parser::parse_extended_report(&extended_out, device, &EXTENDED_V1)?;

        let basic_out = self.run_report(device, false)?;
        let basic = parser::parse_basic_report(&basic_out, device, &BASIC_V1)?;

        Ok(DeviceSample { basic, extended })
    }

    fn run_report(&self, device: &str, extended: bool) -> Result<String, CollectError> {
        let args = self.report_args(device, extended);
        debug!("running {} {}", self.program, args.join(" "));
        Ok(self.runner.run(&self.program, &args, self.deadline())?)
    }

    fn report_args(&self, device: &str, extended: bool) -> Vec<String> {
        let mut args = vec!["-d".to_string(), "-k".to_string()];
        if extended {
            args.push("-x".to_string());
        }
        args.push(device.to_string());
        if !self.since_boot {
            args.push(self.interval.as_secs().to_string());
            args.push("2".to_string());
        }
        args
    }

    fn deadline(&self) -> Duration {
        // 3x the sampling window; the since-boot report returns
        // immediately, so it gets the default window's allowance.
        if self.since_boot {
            Duration::from_secs(30)
        } else {
            self.interval * 3
        }
    }
}
