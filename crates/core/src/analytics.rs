//! Violation statistics over a reporting period.
//!
//! Days are bucketed by the UTC date of `created_at`.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, Days, Months, NaiveDate};
use uuid::Uuid;

use crate::models::{
    analytics::{AnalyticsReport, DailyCount, LabelCount, ReportPeriod},
    student::Student,
    violation::{ViolationRecord, ViolationStatus},
};

pub const TOP_OFFENDERS: usize = 5;

/// First day covered by `period` when the report ends on `today`.
pub fn period_start(period: ReportPeriod, today: NaiveDate) -> NaiveDate {
    match period {
        ReportPeriod::Week => today.checked_sub_days(Days::new(7)),
        ReportPeriod::Month => today.with_day0(0),
        ReportPeriod::Year => today.checked_sub_months(Months::new(12)),
    }
    .unwrap_or(today)
}

fn ranked(counts: HashMap<String, usize>) -> Vec<LabelCount> {
    let mut rows: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    rows
}

pub fn summarize(
    period: ReportPeriod,
    start: NaiveDate,
    end: NaiveDate,
    violations: &[ViolationRecord],
    students: &HashMap<Uuid, Student>,
) -> AnalyticsReport {
    let total = violations.len();
    let attended = violations
        .iter()
        .filter(|v| v.status == ViolationStatus::Attended)
        .count();
    let attendance_rate = if total == 0 {
        0.0
    } else {
        attended as f64 / total as f64 * 100.0
    };

    let distinct_students = violations
        .iter()
        .map(|v| v.student_id)
        .collect::<HashSet<_>>()
        .len();

    let mut by_type: HashMap<String, usize> = HashMap::new();
    let mut by_grade: BTreeMap<i32, usize> = BTreeMap::new();
    let mut offenders: HashMap<String, usize> = HashMap::new();
    let mut daily: BTreeMap<NaiveDate, usize> = start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| (day, 0))
        .collect();

    for violation in violations {
        *by_type.entry(violation.violation_type.clone()).or_default() += 1;
        if let Some(student) = students.get(&violation.student_id) {
            *by_grade.entry(student.grade).or_default() += 1;
            *offenders.entry(student.name.clone()).or_default() += 1;
        }
        if let Some(count) = daily.get_mut(&violation.created_at.date_naive()) {
            *count += 1;
        }
    }

    let mut top_offenders = ranked(offenders);
    top_offenders.truncate(TOP_OFFENDERS);

    AnalyticsReport {
        period,
        start,
        end,
        total_violations: total,
        distinct_students,
        attendance_rate,
        by_type: ranked(by_type),
        by_grade: by_grade
            .into_iter()
            .map(|(grade, count)| LabelCount {
                label: grade.to_string(),
                count,
            })
            .collect(),
        daily: daily
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect(),
        top_offenders,
    }
}
