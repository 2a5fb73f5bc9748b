//! Per-stage wall-clock timing for a pipeline run.
//!
//! Collection is off unless enabled through [`set_timing_enabled`] (the CLI
//! wires this to `--timing` and `ISNAD_TIMING`). Stages appear in the
//! report in the order they first ran.

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde_json::json;

/// Timing for one named pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTiming {
    pub name: String,
    /// Total time spent in this stage across all calls.
    pub elapsed: Duration,
    pub calls: usize,
}

/// Ordered stage timings for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimingReport {
    pub stages: Vec<StageTiming>,
}

thread_local! {
    static STAGES: RefCell<Vec<StageTiming>> = const { RefCell::new(Vec::new()) };
}

static TIMING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Returns true when `ISNAD_TIMING` enables timing collection.
///
/// Supported truthy values: `1`, `true`, `yes`, `on` (case-insensitive).
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var("ISNAD_TIMING")
        .ok()
        .is_some_and(|value| is_truthy(value.as_str()))
}

pub fn set_timing_enabled(enabled: bool) {
    TIMING_ENABLED.store(enabled, Ordering::Relaxed);
    if !enabled {
        clear_timings();
    }
}

#[must_use]
pub fn is_timing_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::Relaxed)
}

/// Clears all recorded timings for the current thread.
pub fn clear_timings() {
    STAGES.with(|stages| stages.borrow_mut().clear());
}

/// Run `f` as the named stage, recording its duration when enabled.
pub fn timed<R>(name: &str, f: impl FnOnce() -> R) -> R {
    if !is_timing_enabled() {
        return f();
    }

    let started = Instant::now();
    let result = f();
    record_stage(name, started.elapsed());
    result
}

/// Drain the current thread's timings into a report.
#[must_use]
pub fn collect_report() -> TimingReport {
    let stages = STAGES.with(|stages| std::mem::take(&mut *stages.borrow_mut()));
    TimingReport { stages }
}

impl TimingReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> Duration {
        self.stages.iter().map(|s| s.elapsed).sum()
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let stages = self
            .stages
            .iter()
            .map(|stage| {
                json!({
                    "name": stage.name,
                    "calls": stage.calls,
                    "elapsed_us": stage.elapsed.as_micros(),
                })
            })
            .collect::<Vec<_>>();

        json!({ "stages": stages, "total_us": self.total().as_micros() })
    }

    /// Render the report as a table for terminal output.
    #[must_use]
    pub fn display_table(&self) -> String {
        use std::fmt::Write as _;

        if self.stages.is_empty() {
            return "No timing samples recorded.".to_string();
        }

        let total = self.total();
        let mut out = String::new();
        out.push_str("stage                        calls    elapsed   share\n");
        out.push_str("----------------------------------------------------\n");

        for stage in &self.stages {
            let _ = writeln!(
                out,
                "{:<28} {:>5} {:>10} {:>6.1}%",
                stage.name,
                stage.calls,
                format_duration(stage.elapsed),
                share_percent(stage.elapsed, total)
            );
        }
        let _ = writeln!(out, "{:<28} {:>5} {:>10}", "total", "", format_duration(total));

        out
    }
}

fn record_stage(name: &str, elapsed: Duration) {
    STAGES.with(|stages| {
        let mut stages = stages.borrow_mut();
        if let Some(existing) = stages.iter_mut().find(|s| s.name == name) {
            existing.elapsed += elapsed;
            existing.calls += 1;
        } else {
            stages.push(StageTiming {
                name: name.to_string(),
                elapsed,
                calls: 1,
            });
        }
    });
}

fn share_percent(part: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    part.as_secs_f64() / total.as_secs_f64() * 100.0
}

fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros >= 1_000_000 {
        let secs = micros / 1_000_000;
        let millis = (micros % 1_000_000) / 1_000;
        format!("{secs}.{millis:03}s")
    } else if micros >= 1_000 {
        let millis = micros / 1_000;
        let rem = micros % 1_000;
        format!("{millis}.{rem:03}ms")
    } else {
        format!("{micros}µs")
    }
}

fn is_truthy(value: &str) -> bool {
    ["1", "true", "yes", "on"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_GUARD: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn timed_does_not_record_when_disabled() {
        let _guard = TEST_GUARD.lock().expect("test guard lock");
        set_timing_enabled(false);

        let value = timed("load", || 7_u8);
        assert_eq!(value, 7);
        assert!(collect_report().is_empty());
    }

    #[test]
    fn stages_keep_first_run_order_and_accumulate() {
        let _guard = TEST_GUARD.lock().expect("test guard lock");
        clear_timings();

        record_stage("load", Duration::from_micros(3_000));
        record_stage("build", Duration::from_micros(1_000));
        record_stage("load", Duration::from_micros(2_000));

        let report = collect_report();
        let names: Vec<_> = report.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["load", "build"]);
        assert_eq!(report.stages[0].calls, 2);
        assert_eq!(report.stages[0].elapsed, Duration::from_micros(5_000));
        assert_eq!(report.total(), Duration::from_micros(6_000));
    }

    #[test]
    fn timed_records_when_enabled() {
        let _guard = TEST_GUARD.lock().expect("test guard lock");
        set_timing_enabled(true);
        clear_timings();

        let value = timed("metrics.pagerank", || 42_u8);
        assert_eq!(value, 42);

        let report = collect_report();
        assert_eq!(report.stages.len(), 1);
        assert_eq!(report.stages[0].name, "metrics.pagerank");

        set_timing_enabled(false);
    }

    #[test]
    fn truthy_parser_is_case_insensitive() {
        assert!(is_truthy("TrUe"));
        assert!(is_truthy("1"));
        assert!(is_truthy("YES"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
    }

    #[test]
    fn table_and_json_have_expected_fields() {
        let _guard = TEST_GUARD.lock().expect("test guard lock");
        clear_timings();
        record_stage("export", Duration::from_micros(1_500));

        let report = collect_report();
        let table = report.display_table();
        assert!(table.contains("stage"));
        assert!(table.contains("export"));
        assert!(table.contains("1.500ms"));

        let json = report.to_json();
        assert_eq!(json["stages"][0]["name"], "export");
        assert_eq!(json["stages"][0]["elapsed_us"], 1_500);
        assert_eq!(json["total_us"], 1_500);
    }
}
