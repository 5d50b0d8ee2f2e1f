use chrono::{DateTime, Months, NaiveDate, Utc};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;
use ui5check_types::catalog::EocpInfo;

static QUARTER_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Q([1-4])/(\d+)").expect("valid quarter regex"));

/// Maps `Q<n>/<year>` labels to date-window facts.
///
/// "Now" is captured once at construction so every label resolves against the same instant,
/// and results are memoized per label for the calculator's lifetime. One calculator per run.
#[derive(Debug, Clone)]
pub struct EocpCalculator {
    now: DateTime<Utc>,
    memo: HashMap<String, EocpInfo>,
}

impl EocpCalculator {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            memo: HashMap::new(),
        }
    }

    /// Returns `None` for labels that do not name a quarter; callers skip EOCP-based notes then.
    pub fn info(&mut self, label: &str) -> Option<EocpInfo> {
        if let Some(info) = self.memo.get(label) {
            return Some(*info);
        }

        let info = compute(label, self.now)?;
        self.memo.insert(label.to_string(), info);
        Some(info)
    }

    pub fn cached_labels(&self) -> usize {
        self.memo.len()
    }
}

fn compute(label: &str, now: DateTime<Utc>) -> Option<EocpInfo> {
    let caps = QUARTER_LABEL.captures(label)?;
    let quarter: u32 = caps[1].parse().ok()?;
    let Ok(year) = caps[2].parse::<i32>() else {
        debug!(label, "quarter label year out of range");
        return None;
    };

    let start = NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1)?;
    let end = start.checked_add_months(Months::new(3))?.pred_opt()?;

    let start_at = start.and_hms_opt(0, 0, 0)?.and_utc();
    let end_at = end.and_hms_opt(0, 0, 0)?.and_utc();

    Some(EocpInfo {
        has_passed_eocp: end_at > now,
        in_eocp_quarter: start_at < now && end_at > now,
        remaining_days: (end - start).num_days().abs(),
        eocp_date: end,
    })
}
