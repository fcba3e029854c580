//! Structural pattern detection over teacher schedules.
//!
//! Three independent rules run per teacher, in this order:
//!
//! - **A, consecutive class**: the same class taught for `consecutive_length`
//!   periods in a row on one day
//! - **B, target periods**: on at least `min_days` days every period in
//!   `target_periods` is taught
//! - **C, period 7**: on at least `min_days` days period 7 is taught (only
//!   when `check_period7` is set)

use std::collections::{BTreeMap, HashSet};

use log::{debug, info};
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::core::{ClassCode, Period, TeacherSchedule, Weekday, PERIODS_PER_DAY};
use crate::error::TimetableResult;
use crate::parsing::TeacherSchedules;

/// Identifier of the rule that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PatternKind {
    #[serde(rename = "patternA")]
    ConsecutiveClass,
    #[serde(rename = "patternB")]
    TargetPeriods,
    #[serde(rename = "patternC")]
    LastPeriod,
}

/// A run of identical classes on one day, periods `start..=end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConsecutiveRun {
    pub day: Weekday,
    pub start: Period,
    pub end: Period,
    pub class_code: ClassCode,
}

/// Structural parameters behind a finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindingDetail {
    Consecutive(ConsecutiveRun),
    TargetPeriods {
        days: Vec<Weekday>,
        periods: Vec<Period>,
    },
    LastPeriod {
        days: Vec<Weekday>,
    },
}

/// One triggered pattern for one teacher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: PatternKind,
    pub detail: FindingDetail,
    pub message: String,
}

/// Trigger state of a day-breadth pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayBreadth {
    pub triggered: bool,
    pub days: Vec<Weekday>,
}

impl DayBreadth {
    fn triggered(days: Vec<Weekday>) -> Self {
        Self {
            triggered: true,
            days,
        }
    }
}

/// Machine-readable result of all three patterns for one teacher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeacherSummary {
    #[serde(rename = "patternA")]
    pub pattern_a: Vec<ConsecutiveRun>,
    #[serde(rename = "patternB")]
    pub pattern_b: DayBreadth,
    #[serde(rename = "patternC")]
    pub pattern_c: DayBreadth,
}

impl TeacherSummary {
    pub fn any_triggered(&self) -> bool {
        !self.pattern_a.is_empty() || self.pattern_b.triggered || self.pattern_c.triggered
    }
}

/// Findings and summaries for every analyzed teacher.
///
/// `summaries` has an entry for every teacher, `findings` only for teachers
/// with at least one finding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternReport {
    pub findings: BTreeMap<String, Vec<Finding>>,
    pub summaries: BTreeMap<String, TeacherSummary>,
}

impl PatternReport {
    /// Rendered messages per flagged teacher, in evaluation order.
    pub fn messages(&self) -> BTreeMap<String, Vec<String>> {
        self.findings
            .iter()
            .map(|(teacher, findings)| {
                let messages = findings.iter().map(|f| f.message.clone()).collect();
                (teacher.clone(), messages)
            })
            .collect()
    }

    pub fn finding_count(&self) -> usize {
        self.findings.values().map(Vec::len).sum()
    }
}

/// Finds every window of `length` periods on a day holding a single class.
///
/// Overlapping windows of one long run are each reported; only exact
/// duplicates are dropped.
pub fn find_consecutive_runs(schedule: &TeacherSchedule, length: usize) -> Vec<ConsecutiveRun> {
    let mut runs = Vec::new();
    let mut seen = HashSet::new();
    let Ok(span) = Period::try_from(length) else {
        return runs;
    };
    if span == 0 || span > PERIODS_PER_DAY {
        return runs;
    }

    for day in Weekday::ALL {
        for start in 1..=PERIODS_PER_DAY - span + 1 {
            let end = start + span - 1;
            let Some(first) = schedule.get(day, start) else {
                continue;
            };
            let uniform = (start + 1..=end).all(|p| schedule.get(day, p) == Some(first));
            if !uniform {
                continue;
            }

            let run = ConsecutiveRun {
                day,
                start,
                end,
                class_code: first.clone(),
            };
            if seen.insert(run.clone()) {
                runs.push(run);
            }
        }
    }

    runs
}

/// Days, in canonical order, on which every period in `periods` is taught.
pub fn days_with_all_periods(schedule: &TeacherSchedule, periods: &[Period]) -> Vec<Weekday> {
    Weekday::ALL
        .into_iter()
        .filter(|day| periods.iter().all(|p| schedule.is_occupied(*day, *p)))
        .collect()
}

fn join_days(days: &[Weekday]) -> String {
    days.iter().map(|d| d.label()).collect::<Vec<_>>().join(",")
}

fn consecutive_message(teacher: &str, run: &ConsecutiveRun) -> String {
    format!(
        "이 시간표는 {} 선생님이 {}요일에 {}~{}교시 연속 {}입니다.",
        teacher,
        run.day,
        run.start,
        run.end,
        run.class_code.describe()
    )
}

fn target_periods_message(
    teacher: &str,
    min_days: usize,
    periods: &[Period],
    days: &[Weekday],
) -> String {
    let periods_text = periods
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "이 시간표는 {} 선생님이 {}일 중 {}일 이상 ({})교시에 수업이 있는 시간표입니다. (해당 요일: {})",
        teacher,
        Weekday::ALL.len(),
        min_days,
        periods_text,
        join_days(days)
    )
}

fn last_period_message(teacher: &str, min_days: usize, days: &[Weekday]) -> String {
    format!(
        "이 시간표는 {} 선생님이 {}일 중 {}일 이상 {}교시에 수업이 있는 시간표입니다. (해당 요일: {})",
        teacher,
        Weekday::ALL.len(),
        min_days,
        PERIODS_PER_DAY,
        join_days(days)
    )
}

/// Evaluates the three patterns for one teacher.
pub fn analyze_teacher(
    teacher: &str,
    schedule: &TeacherSchedule,
    config: &AnalysisConfig,
) -> (Vec<Finding>, TeacherSummary) {
    let mut findings = Vec::new();
    let mut summary = TeacherSummary::default();

    for run in find_consecutive_runs(schedule, config.consecutive_length) {
        findings.push(Finding {
            kind: PatternKind::ConsecutiveClass,
            message: consecutive_message(teacher, &run),
            detail: FindingDetail::Consecutive(run.clone()),
        });
        summary.pattern_a.push(run);
    }

    let days = days_with_all_periods(schedule, &config.target_periods);
    if days.len() >= config.min_days {
        findings.push(Finding {
            kind: PatternKind::TargetPeriods,
            message: target_periods_message(teacher, config.min_days, &config.target_periods, &days),
            detail: FindingDetail::TargetPeriods {
                days: days.clone(),
                periods: config.target_periods.clone(),
            },
        });
        summary.pattern_b = DayBreadth::triggered(days);
    }

    if config.check_period7 {
        let days = days_with_all_periods(schedule, &[PERIODS_PER_DAY]);
        if days.len() >= config.min_days {
            findings.push(Finding {
                kind: PatternKind::LastPeriod,
                message: last_period_message(teacher, config.min_days, &days),
                detail: FindingDetail::LastPeriod { days: days.clone() },
            });
            summary.pattern_c = DayBreadth::triggered(days);
        }
    }

    (findings, summary)
}

/// Runs all patterns over every teacher.
///
/// # Errors
///
/// `ConfigurationError` if `config` is out of range; nothing is analyzed then.
pub fn analyze_patterns(
    schedules: &TeacherSchedules,
    config: &AnalysisConfig,
) -> TimetableResult<PatternReport> {
    config.validate()?;

    let mut report = PatternReport::default();
    for (teacher, schedule) in schedules {
        let (findings, summary) = analyze_teacher(teacher, schedule, config);
        if !findings.is_empty() {
            debug!("{}: {} findings", teacher, findings.len());
            report.findings.insert(teacher.clone(), findings);
        }
        report.summaries.insert(teacher.clone(), summary);
    }

    info!(
        "Analyzed {} teachers: {} findings across {} teachers",
        report.summaries.len(),
        report.finding_count(),
        report.findings.len()
    );
    Ok(report)
}
