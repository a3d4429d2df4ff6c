//! Status-line and performance-data rendering.
//!
//! Output is one newline-terminated line on stdout:
//! `<STATUS> - <heading> Label=value ...`, optionally followed by
//! ` | name=value;warn;crit;` tokens in the monitoring-plugin
//! performance-data convention. Either the full line is produced or
//! nothing; errors never emit partial output.

use std::fmt::Write;

use crate::threshold::{EvaluationResult, ThresholdSet};

/// Renders the status line, with performance data when `perfdata` is set.
pub fn render(result: &EvaluationResult, perfdata: bool) -> String {
    let defs = result.metrics.mode.metric_defs();

    let mut line = format!("{} - {}", result.status, result.metrics.mode.heading());
    for (def, value) in defs.iter().zip(&result.metrics.values) {
        let _ = write!(line, " {}={:.2}", def.label, value);
    }

    if perfdata {
        line.push_str(" |");
        for (slot, (def, value)) in defs.iter().zip(&result.metrics.values).enumerate() {
            let _ = write!(
                line,
                " {}={:.2};{};{};",
                def.perf_name,
                value,
                threshold_field(&result.warning, slot),
                threshold_field(&result.critical, slot)
            );
        }
    }

    line
}

/// A perfdata threshold sub-field: the plain number, or empty when unset.
fn threshold_field(tier: &ThresholdSet, slot: usize) -> String {
    tier.get(slot).map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricSet, Mode};
    use crate::threshold::{Status, ThresholdSet, evaluate};

    fn throughput_result() -> EvaluationResult {
        evaluate(
            MetricSet {
                mode: Mode::Throughput,
                values: vec![10.5, 2.0, 6.0, 64.0, 256.0],
            },
            ThresholdSet::unset(),
            ThresholdSet::unset(),
        )
    }

    #[test]
    fn plain_line_without_perfdata() {
        let line = render(&throughput_result(), false);
        assert_eq!(
            line,
            "OK - I/O stats: Transfers/Sec=10.50 Reads/Sec=2.00 Writes/Sec=6.00 \
             KB-Read/Sec=64.00 KB-Written/Sec=256.00"
        );
    }

    #[test]
    fn perfdata_with_unset_thresholds_has_empty_subfields() {
        let line = render(&throughput_result(), true);
        assert!(line.starts_with("OK - I/O stats: Transfers/Sec=10.50"));
        assert!(line.contains(" | total_io_sec=10.50;;;"));
        assert!(line.ends_with("kb_written_sec=256.00;;;"));
    }

    #[test]
    fn perfdata_carries_the_originating_thresholds() {
        let result = evaluate(
            MetricSet {
                mode: Mode::Queue,
                values: vec![6.0, 1.0, 1.0, 1.0],
            },
            ThresholdSet::parse("5,2").unwrap(),
            ThresholdSet::parse("10,4").unwrap(),
        );
        let line = render(&result, true);

        assert!(line.starts_with("WARNING - Queue stats: Queue-Length=6.00"));
        assert!(line.contains("queue_length=6.00;5;10;"));
        assert!(line.contains("avg_request_kb=1.00;2;4;"));
        // Slots without thresholds keep empty sub-fields.
        assert!(line.contains("avg_read_request_kb=1.00;;;"));
    }

    #[test]
    fn fractional_thresholds_render_as_given() {
        let result = evaluate(
            MetricSet {
                mode: Mode::Wait,
                values: vec![60.0, 1.0, 1.0, 1.0],
            },
            ThresholdSet::unset(),
            ThresholdSet::parse("50.5,,,").unwrap(),
        );
        let line = render(&result, true);

        assert_eq!(result.status, Status::Critical);
        assert!(line.starts_with("CRITICAL - Wait stats: Avg-Read-Wait-Ms=60.00"));
        assert!(line.contains("avg_read_wait_ms=60.00;;50.5;"));
    }
}
