//! Relative commit times.
//!
//! A [`CommitTime`] pairs a branch's last-commit instant with a short
//! human-readable label ("4d ago", "2mo from now"). The label is computed
//! once at construction against the supplied reference instant and never
//! recomputed, so it reflects the age as of construction time.

use crate::error::{ReportError, Result};
use chrono::{DateTime, Datelike, SecondsFormat, TimeZone, Utc};
use std::cmp::Ordering;
use std::fmt;

pub const SECONDS_PER_YEAR: i64 = 31_536_000;
pub const SECONDS_PER_WEEK: i64 = 604_800;
pub const SECONDS_PER_DAY: i64 = 86_400;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_MINUTE: i64 = 60;

/// Fixed-unit steps of the label chain, evaluated in order after the year
/// and month candidates. First non-zero rounded count wins.
const UNIT_STEPS: [(i64, &str); 3] = [
    (SECONDS_PER_DAY, "d"),
    (SECONDS_PER_HOUR, "h"),
    (SECONDS_PER_MINUTE, "m"),
];

/// A branch's last commit time and its relative representation.
///
/// Ordered and compared by epoch seconds only; the label never
/// participates in comparisons.
#[derive(Clone, Debug)]
pub struct CommitTime {
    instant: DateTime<Utc>,
    label: String,
}

impl CommitTime {
    /// Build from an absolute instant and a reference "now".
    ///
    /// Any pair of instants is accepted; an instant after `now` yields a
    /// "from now" label instead of "ago".
    pub fn new(instant: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let label = relative_label(instant, now);
        Self { instant, label }
    }

    /// Build from raw epoch seconds, as handed over by the VCS collaborator.
    pub fn from_epoch(epoch_seconds: i64, now: DateTime<Utc>) -> Result<Self> {
        let instant = Utc
            .timestamp_opt(epoch_seconds, 0)
            .single()
            .ok_or(ReportError::TimestampOutOfRange(epoch_seconds))?;
        Ok(Self::new(instant, now))
    }

    /// The relative label, e.g. "4d ago".
    pub fn relative_label(&self) -> &str {
        &self.label
    }

    /// The commit instant as integer epoch seconds. Sort key for reports.
    pub fn epoch_seconds(&self) -> i64 {
        self.instant.timestamp()
    }

    /// The absolute commit instant.
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// ISO-8601 / RFC 3339 rendering of the absolute instant.
    pub fn iso8601(&self) -> String {
        self.instant.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Parse a canonical string (`"2012-09-28 14:23 +0000 (4d ago)"`)
    /// back into a commit time. The embedded label is kept verbatim; it is
    /// not recomputed against a new "now".
    pub fn parse_canonical(s: &str) -> Result<Self> {
        let (prefix, label) = match s.split_once(" (") {
            Some((prefix, rest)) => {
                let label = rest
                    .strip_suffix(')')
                    .ok_or_else(|| ReportError::InvalidCanonicalTime(s.to_string()))?;
                (prefix, label.to_string())
            }
            None => return Err(ReportError::InvalidCanonicalTime(s.to_string())),
        };

        let instant = DateTime::parse_from_str(prefix, "%Y-%m-%d %H:%M %z")
            .map_err(|_| ReportError::InvalidCanonicalTime(s.to_string()))?
            .with_timezone(&Utc);

        Ok(Self { instant, label })
    }
}

/// Canonical long form: fixed-width date, 24-hour time, UTC offset, then
/// the relative label in parentheses.
impl fmt::Display for CommitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.instant.format("%Y-%m-%d %H:%M %z"), self.label)
    }
}

impl PartialEq for CommitTime {
    fn eq(&self, other: &Self) -> bool {
        self.epoch_seconds() == other.epoch_seconds()
    }
}

impl Eq for CommitTime {}

impl PartialOrd for CommitTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CommitTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch_seconds().cmp(&other.epoch_seconds())
    }
}

/// Rounded unit count with the below-one-unit short-circuit: zero when the
/// magnitude is under one unit, otherwise round-half-away-from-zero.
fn rounded_count(delta_seconds: i64, unit: i64) -> i64 {
    let magnitude = delta_seconds.abs();
    if magnitude < unit {
        0
    } else {
        (magnitude + unit / 2) / unit
    }
}

/// Signed calendar month span between two instants, counted from year and
/// month fields rather than elapsed seconds.
fn calendar_month_span(instant: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let a = i64::from(instant.year()) * 12 + i64::from(instant.month());
    let b = i64::from(now.year()) * 12 + i64::from(now.month());
    a - b
}

/// Pick the dominant unit for the delta between `instant` and `now`.
///
/// Highest-priority non-zero unit wins: years, then calendar months (only
/// when the duration spans more than four weeks), then weeks, then the
/// fixed steps down to a truncated seconds fallback.
fn relative_label(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = instant.timestamp() - now.timestamp();
    let suffix = if delta > 0 { "from now" } else { "ago" };

    let years = rounded_count(delta, SECONDS_PER_YEAR);
    if years > 0 {
        return format!("{years}y {suffix}");
    }

    // Months are calendar-aware and only beat weeks when the span is more
    // than four weeks; otherwise "5w" reads better than "1mo".
    let months = calendar_month_span(instant, now).abs();
    let weeks = rounded_count(delta, SECONDS_PER_WEEK);
    if months > 0 && weeks > 4 {
        return format!("{months}mo {suffix}");
    }
    if weeks > 0 {
        return format!("{weeks}w {suffix}");
    }

    for (unit, code) in UNIT_STEPS {
        let count = rounded_count(delta, unit);
        if count > 0 {
            return format!("{count}{code} {suffix}");
        }
    }

    format!("{}s {suffix}", delta.abs())
}
