//! Check configuration and validation.
//!
//! Everything that can be rejected before touching the statistics
//! provider is rejected here: the device must exist as a block device,
//! threshold lists must parse, fit the mode's metric count, and keep
//! critical at or above warning wherever both are set.

use std::path::Path;

use crate::metrics::Mode;
use crate::threshold::{ThresholdParseError, ThresholdSet};

/// Error type for configuration failures.
#[derive(Debug)]
pub enum ConfigError {
    /// The named device has no entry in the sysfs block directory.
    UnknownDevice { device: String, sys_block: String },
    /// A threshold list did not parse.
    Threshold(ThresholdParseError),
    /// More threshold slots than the selected mode has metrics.
    TooManySlots {
        tier: &'static str,
        given: usize,
        metrics: usize,
    },
    /// A critical threshold below its corresponding warning threshold.
    InvertedThreshold {
        slot: usize,
        warning: f64,
        critical: f64,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::UnknownDevice { device, sys_block } => write!(
                f,
                "'{}' is not a block device (no entry under {})",
                device, sys_block
            ),
            ConfigError::Threshold(e) => write!(f, "{}", e),
            ConfigError::TooManySlots {
                tier,
                given,
                metrics,
            } => write!(
                f,
                "{} list has {} slots but the selected mode has {} metrics",
                tier, given, metrics
            ),
            ConfigError::InvertedThreshold {
                slot,
                warning,
                critical,
            } => write!(
                f,
                "critical threshold {} is below warning threshold {} in slot {}",
                critical,
                warning,
                slot + 1
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ThresholdParseError> for ConfigError {
    fn from(e: ThresholdParseError) -> Self {
        ConfigError::Threshold(e)
    }
}

/// Validated configuration for one check invocation.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub device: String,
    pub mode: Mode,
    pub warning: ThresholdSet,
    pub critical: ThresholdSet,
    pub perfdata: bool,
    pub since_boot: bool,
}

impl CheckConfig {
    /// Builds and validates a configuration.
    ///
    /// `sys_block_path` is the sysfs directory listing block devices
    /// (`/sys/class/block` in production, a temp dir in tests).
    pub fn new(
        device: &str,
        mode: Mode,
        warning: Option<&str>,
        critical: Option<&str>,
        perfdata: bool,
        since_boot: bool,
        sys_block_path: &Path,
    ) -> Result<Self, ConfigError> {
        // Reject path components outright so the existence probe cannot
        // be steered outside the sysfs directory.
        if device.is_empty()
            || device.contains('/')
            || device == "."
            || device == ".."
            || !sys_block_path.join(device).exists()
        {
            return Err(ConfigError::UnknownDevice {
                device: device.to_string(),
                sys_block: sys_block_path.display().to_string(),
            });
        }

        let warning = parse_tier(warning, "warning", mode)?;
        let critical = parse_tier(critical, "critical", mode)?;

        for slot in 0..mode.metric_count() {
            if let (Some(w), Some(c)) = (warning.get(slot), critical.get(slot))
                && c < w
            {
                return Err(ConfigError::InvertedThreshold {
                    slot,
                    warning: w,
                    critical: c,
                });
            }
        }

        Ok(Self {
            device: device.to_string(),
            mode,
            warning,
            critical,
            perfdata,
            since_boot,
        })
    }
}

fn parse_tier(
    list: Option<&str>,
    tier: &'static str,
    mode: Mode,
) -> Result<ThresholdSet, ConfigError> {
    let Some(list) = list else {
        return Ok(ThresholdSet::unset());
    };
    let set = ThresholdSet::parse(list)?;
    if set.len() > mode.metric_count() {
        return Err(ConfigError::TooManySlots {
            tier,
            given: set.len(),
            metrics: mode.metric_count(),
        });
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Temp stand-in for /sys/class/block with one known device.
    fn sys_block() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sda")).unwrap();
        dir
    }

    #[test]
    fn accepts_a_plain_config() {
        let dir = sys_block();
        let config = CheckConfig::new(
            "sda",
            Mode::Throughput,
            None,
            None,
            true,
            false,
            dir.path(),
        )
        .unwrap();

        assert_eq!(config.device, "sda");
        assert!(config.warning.is_empty());
        assert!(config.critical.is_empty());
        assert!(config.perfdata);
    }

    #[test]
    fn rejects_unknown_devices() {
        let dir = sys_block();
        let err = CheckConfig::new(
            "nonexistent",
            Mode::Throughput,
            None,
            None,
            false,
            false,
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDevice { .. }));
    }

    #[test]
    fn rejects_path_separators_in_device_names() {
        let dir = sys_block();
        // The parent directory exists, but it is not a device entry.
        let err =
            CheckConfig::new("..", Mode::Queue, None, None, false, false, dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDevice { .. }));

        let err = CheckConfig::new(
            "../sda",
            Mode::Queue,
            None,
            None,
            false,
            false,
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDevice { .. }));
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let dir = sys_block();
        let err = CheckConfig::new(
            "sda",
            Mode::Throughput,
            Some("5,1"),
            Some("3,1"),
            false,
            false,
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvertedThreshold {
                slot: 0,
                warning: 5.0,
                critical: 3.0
            }
        ));
    }

    #[test]
    fn equal_thresholds_are_allowed() {
        let dir = sys_block();
        let config = CheckConfig::new(
            "sda",
            Mode::Throughput,
            Some("5,1"),
            Some("5,1"),
            false,
            false,
            dir.path(),
        )
        .unwrap();
        assert_eq!(config.warning.get(0), Some(5.0));
        assert_eq!(config.critical.get(0), Some(5.0));
    }

    #[test]
    fn sparse_tiers_only_compare_where_both_are_set() {
        let dir = sys_block();
        // Critical slot 1 is empty, so warning 9 there cannot conflict.
        let config = CheckConfig::new(
            "sda",
            Mode::Wait,
            Some(",9,,"),
            Some("50,,,"),
            false,
            false,
            dir.path(),
        )
        .unwrap();
        assert_eq!(config.warning.get(1), Some(9.0));
        assert_eq!(config.critical.get(0), Some(50.0));
    }

    #[test]
    fn rejects_too_many_slots_for_the_mode() {
        let dir = sys_block();
        // Queue mode has four metrics; five slots cannot be matched.
        let err = CheckConfig::new(
            "sda",
            Mode::Queue,
            Some("1,2,3,4,5"),
            None,
            false,
            false,
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::TooManySlots { given: 5, .. }));
    }

    #[test]
    fn rejects_unparseable_threshold_lists() {
        let dir = sys_block();
        let err = CheckConfig::new(
            "sda",
            Mode::Throughput,
            Some("1,up"),
            None,
            false,
            false,
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Threshold(_)));
    }
}
