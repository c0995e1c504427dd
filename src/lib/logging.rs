//! Formatting for progress and run-log output.
//!
//! The pipeline reports each stage the same way: announce the stage, then
//! summarise it with an item count, the wall time, and the throughput.
//! These helpers render all three.

use std::time::{Duration, Instant};

/// Renders a count with `,` thousands separators.
///
/// # Examples
///
/// ```
/// use lshclust_lib::logging::format_count;
///
/// assert_eq!(format_count(482), "482");
/// assert_eq!(format_count(1_200_300), "1,200,300");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (offset, digit) in digits.bytes().enumerate() {
        // A separator goes before every digit whose distance from the end
        // is a positive multiple of three.
        if offset > 0 && (digits.len() - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(char::from(digit));
    }
    out
}

/// Renders an elapsed wall-clock time at the coarsest useful unit pair:
/// seconds under a minute, minutes and seconds under an hour, hours and
/// minutes beyond that.
///
/// # Examples
///
/// ```
/// use lshclust_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
/// ```
#[must_use]
pub fn format_duration(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    match (total / 3600, total % 3600 / 60, total % 60) {
        (0, 0, secs) => format!("{secs}s"),
        (0, mins, 0) => format!("{mins}m"),
        (0, mins, secs) => format!("{mins}m {secs}s"),
        (hours, 0, _) => format!("{hours}h"),
        (hours, mins, _) => format!("{hours}h {mins}m"),
    }
}

/// Renders throughput as `<count> <what>/s`, falling back to a per-minute
/// figure when fewer than one item completes per second.
///
/// `what` names the items being counted, e.g. `"read pairs"`.
///
/// # Examples
///
/// ```
/// use lshclust_lib::logging::format_rate;
/// use std::time::Duration;
///
/// assert_eq!(format_rate(4000, Duration::from_secs(2), "read pairs"), "2,000 read pairs/s");
/// assert_eq!(format_rate(12, Duration::from_secs(60), "clusters"), "12.0 clusters/min");
/// ```
#[must_use]
pub fn format_rate(count: u64, elapsed: Duration, what: &str) -> String {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return format!("{} {what}/s", format_count(count));
    }

    let per_sec = count as f64 / secs;
    if per_sec >= 1.0 {
        format!("{} {what}/s", format_count(per_sec as u64))
    } else {
        format!("{:.1} {what}/min", per_sec * 60.0)
    }
}

/// Wall-clock timer for one pipeline stage.
///
/// Announces the stage when started and reports the item count, elapsed
/// time, and throughput when the stage finishes.
///
/// # Examples
///
/// ```no_run
/// use lshclust_lib::logging::StageTimer;
///
/// let timer = StageTimer::start("Extracting barcodes and minimizers");
///
/// // ... stage work ...
///
/// timer.finish(10_000, "read pairs");
/// ```
pub struct StageTimer {
    stage: String,
    started: Instant,
}

impl StageTimer {
    /// Announces the stage and starts the clock.
    #[must_use]
    pub fn start(stage: &str) -> Self {
        log::info!("{stage} ...");
        Self { stage: stage.to_string(), started: Instant::now() }
    }

    /// Logs the stage summary, e.g.
    /// `Clustering: 1,204 clusters in 2m 5s (9 clusters/s)`.
    pub fn finish(&self, count: u64, what: &str) {
        let elapsed = self.started.elapsed();
        log::info!(
            "{}: {} {} in {} ({})",
            self.stage,
            format_count(count),
            what,
            format_duration(elapsed),
            format_rate(count, elapsed, what)
        );
    }
}
