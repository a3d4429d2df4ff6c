//! check-iostat - Nagios-compatible block-device I/O check.
//!
//! Samples device statistics via the external `iostat` utility, compares
//! the selected metric family against warning/critical thresholds and
//! prints a single status line with optional performance data.
//!
//! Usage:
//!   check-iostat -d sda -i                      # throughput, no alerting
//!   check-iostat -d sda -q -w 5,2 -c 10,4       # queue depth thresholds
//!   check-iostat -d sda -W -c 50,,, -p          # read-wait critical + perfdata
//!   check-iostat -d sda -i -g                   # averages since boot

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{ArgGroup, Parser};
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

use check_iostat::collector::{IostatCollector, SystemRunner};
use check_iostat::config::CheckConfig;
use check_iostat::metrics::{MetricSet, Mode};
use check_iostat::report::render;
use check_iostat::threshold::{Status, evaluate};

/// Block-device I/O statistics check for Nagios-compatible monitoring.
#[derive(Parser, Debug)]
#[command(name = "check-iostat", about = "Block-device I/O statistics check", version)]
#[command(group(ArgGroup::new("mode").required(true)))]
struct Args {
    /// Block device to sample (e.g. "sda").
    #[arg(short = 'd', long, default_value = "sda")]
    device: String,

    /// Check I/O throughput (transfers and kilobytes per second).
    #[arg(short = 'i', long = "io", group = "mode")]
    io: bool,

    /// Check queue depth and request sizes.
    #[arg(short = 'q', long = "queue", group = "mode")]
    queue: bool,

    /// Check request wait times and device utilization.
    #[arg(short = 'W', long = "waittime", group = "mode")]
    waittime: bool,

    /// Warning thresholds: one comma-separated slot per metric of the
    /// selected mode. Empty slots never alert (e.g. "50,,,").
    #[arg(short = 'w', long, value_name = "LIST")]
    warning: Option<String>,

    /// Critical thresholds, same shape as --warning.
    #[arg(short = 'c', long, value_name = "LIST")]
    critical: Option<String>,

    /// Append performance data for graphing systems.
    #[arg(short = 'p', long)]
    perfdata: bool,

    /// Report averages since boot instead of sampling a live window.
    #[arg(short = 'g', long = "since-boot")]
    since_boot: bool,

    /// Sampling window in seconds for live mode.
    #[arg(
        long,
        default_value = "10",
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval: u64,

    /// Path to the statistics provider binary.
    #[arg(long, default_value = "iostat", value_name = "PATH")]
    iostat_path: String,

    /// Sysfs directory used to validate the device name (for testing/mocking).
    #[arg(long, default_value = "/sys/class/block", value_name = "PATH")]
    sys_block_path: PathBuf,

    /// Increase logging verbosity (once for debug, twice for trace).
    #[arg(long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(long)]
    quiet: bool,
}

impl Args {
    fn mode(&self) -> Mode {
        if self.io {
            Mode::Throughput
        } else if self.queue {
            Mode::Queue
        } else {
            Mode::Wait
        }
    }
}

/// Initializes the tracing subscriber with the appropriate log level.
///
/// Logs go to stderr so the plugin line on stdout stays machine-parseable.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("check_iostat={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // clap exits 2 on usage errors by default; monitoring
            // schedulers reserve 2 for CRITICAL, so remap to UNKNOWN.
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => Status::Unknown.exit_code(),
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logging(args.verbose, args.quiet);

    let config = match CheckConfig::new(
        &args.device,
        args.mode(),
        args.warning.as_deref(),
        args.critical.as_deref(),
        args.perfdata,
        args.since_boot,
        &args.sys_block_path,
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run 'check-iostat --help' for usage.");
            process::exit(Status::Unknown.exit_code());
        }
    };

    debug!(
        "checking device {} ({}s window, since_boot={})",
        config.device, args.interval, config.since_boot
    );

    let collector = IostatCollector::new(SystemRunner::new(), args.iostat_path.as_str())
        .with_interval(Duration::from_secs(args.interval))
        .since_boot(config.since_boot);

    let sample = match collector.collect(&config.device) {
        Ok(sample) => sample,
        Err(e) => {
            println!("UNKNOWN - {}", e);
            process::exit(Status::Unknown.exit_code());
        }
    };

    let metrics = MetricSet::from_sample(config.mode, &sample);
    let result = evaluate(metrics, config.warning, config.critical);

    println!("{}", render(&result, config.perfdata));
    process::exit(result.status.exit_code());
}
