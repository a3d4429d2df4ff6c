//! Threshold parsing and tiered evaluation.
//!
//! Thresholds arrive as comma-separated slot lists ("50,,,"). An empty
//! slot, like a missing tier, is a first-class unset state that never
//! alerts; there is no magic sentinel value.

use crate::metrics::MetricSet;

/// Final check status, ordered by severity.
///
/// Maps to the conventional monitoring-plugin exit codes; every
/// configuration, collection or parse failure exits as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    pub fn exit_code(&self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        };
        write!(f, "{}", name)
    }
}

/// Error type for threshold-list parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdParseError {
    pub input: String,
    pub message: String,
}

impl std::fmt::Display for ThresholdParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid threshold list '{}': {}",
            self.input, self.message
        )
    }
}

impl std::error::Error for ThresholdParseError {}

/// One tier's threshold slots, positionally matched to a mode's metrics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdSet {
    slots: Vec<Option<f64>>,
}

impl ThresholdSet {
    /// A tier that was not supplied at all; it never triggers.
    pub fn unset() -> Self {
        Self::default()
    }

    /// Parses a comma-separated slot list. Empty slots stay unset; every
    /// non-empty slot must be a finite number.
    pub fn parse(input: &str) -> Result<Self, ThresholdParseError> {
        let mut slots = Vec::new();
        for field in input.split(',') {
            let field = field.trim();
            if field.is_empty() {
                slots.push(None);
                continue;
            }
            let value: f64 = field.parse().map_err(|_| ThresholdParseError {
                input: input.to_string(),
                message: format!("slot '{}' is not a number", field),
            })?;
            if !value.is_finite() {
                return Err(ThresholdParseError {
                    input: input.to_string(),
                    message: format!("slot '{}' is not a finite number", field),
                });
            }
            slots.push(Some(value));
        }
        Ok(Self { slots })
    }

    /// The threshold for `slot`, if one was supplied.
    pub fn get(&self, slot: usize) -> Option<f64> {
        self.slots.get(slot).copied().flatten()
    }

    /// Number of slots supplied (set or empty).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// The evaluated check: final status plus everything the formatter needs.
#[derive(Debug, Clone)]
pub struct EvaluationResult {
    pub status: Status,
    pub metrics: MetricSet,
    pub warning: ThresholdSet,
    pub critical: ThresholdSet,
}

/// Compares each metric against its positional thresholds.
///
/// A metric at or above its slot's threshold breaches that tier; any
/// breach trips the tier, and critical outranks warning. An unset tier or
/// slot never trips.
pub fn evaluate(metrics: MetricSet, warning: ThresholdSet, critical: ThresholdSet) -> EvaluationResult {
    let status = if breaches(&metrics, &critical) {
        Status::Critical
    } else if breaches(&metrics, &warning) {
        Status::Warning
    } else {
        Status::Ok
    };

    EvaluationResult {
        status,
        metrics,
        warning,
        critical,
    }
}

fn breaches(metrics: &MetricSet, tier: &ThresholdSet) -> bool {
    metrics
        .values
        .iter()
        .enumerate()
        .any(|(slot, value)| matches!(tier.get(slot), Some(limit) if *value >= limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Mode;

    fn queue_metrics(values: Vec<f64>) -> MetricSet {
        MetricSet {
            mode: Mode::Queue,
            values,
        }
    }

    #[test]
    fn parses_full_and_sparse_lists() {
        let set = ThresholdSet::parse("5,2").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0), Some(5.0));
        assert_eq!(set.get(1), Some(2.0));
        assert_eq!(set.get(2), None);

        let set = ThresholdSet::parse("50,,,").unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.get(0), Some(50.0));
        assert_eq!(set.get(1), None);
        assert_eq!(set.get(3), None);
    }

    #[test]
    fn rejects_garbage_slots() {
        assert!(ThresholdSet::parse("5,abc").is_err());
        assert!(ThresholdSet::parse("NaN").is_err());
        assert!(ThresholdSet::parse("inf,1").is_err());
    }

    #[test]
    fn no_thresholds_is_always_ok() {
        let result = evaluate(
            queue_metrics(vec![1e9, 1e9, 1e9, 1e9]),
            ThresholdSet::unset(),
            ThresholdSet::unset(),
        );
        assert_eq!(result.status, Status::Ok);
    }

    #[test]
    fn all_below_both_tiers_is_ok() {
        let result = evaluate(
            queue_metrics(vec![1.0, 1.0, 1.0, 1.0]),
            ThresholdSet::parse("5,5,5,5").unwrap(),
            ThresholdSet::parse("10,10,10,10").unwrap(),
        );
        assert_eq!(result.status, Status::Ok);
    }

    #[test]
    fn one_breach_trips_the_tier() {
        // Queue length 6 against warning 5 / critical 10: warning only.
        let result = evaluate(
            queue_metrics(vec![6.0, 1.0, 1.0, 1.0]),
            ThresholdSet::parse("5,2").unwrap(),
            ThresholdSet::parse("10,4").unwrap(),
        );
        assert_eq!(result.status, Status::Warning);
        assert_eq!(result.status.exit_code(), 1);
    }

    #[test]
    fn critical_outranks_warning() {
        let result = evaluate(
            queue_metrics(vec![20.0, 1.0, 1.0, 1.0]),
            ThresholdSet::parse("5").unwrap(),
            ThresholdSet::parse("10").unwrap(),
        );
        assert_eq!(result.status, Status::Critical);
        assert_eq!(result.status.exit_code(), 2);
    }

    #[test]
    fn equality_breaches() {
        let result = evaluate(
            queue_metrics(vec![5.0, 0.0, 0.0, 0.0]),
            ThresholdSet::parse("5").unwrap(),
            ThresholdSet::unset(),
        );
        assert_eq!(result.status, Status::Warning);
    }

    #[test]
    fn empty_slots_never_trip() {
        // Only the first slot is set; huge values elsewhere are ignored.
        let result = evaluate(
            queue_metrics(vec![1.0, 1e9, 1e9, 1e9]),
            ThresholdSet::unset(),
            ThresholdSet::parse("50,,,").unwrap(),
        );
        assert_eq!(result.status, Status::Ok);
    }

    #[test]
    fn critical_only_tier_trips_on_its_own() {
        let result = evaluate(
            queue_metrics(vec![60.0, 0.0, 0.0, 0.0]),
            ThresholdSet::unset(),
            ThresholdSet::parse("50,,,").unwrap(),
        );
        assert_eq!(result.status, Status::Critical);
    }

    #[test]
    fn status_ordering_and_exit_codes() {
        assert!(Status::Ok < Status::Warning);
        assert!(Status::Warning < Status::Critical);
        assert_eq!(Status::Ok.exit_code(), 0);
        assert_eq!(Status::Unknown.exit_code(), 3);
        assert_eq!(Status::Critical.to_string(), "CRITICAL");
    }
}
