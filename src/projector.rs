//! Attendance arithmetic: display percentages, status buckets and how many
//! more classes can be missed while staying at or above the cutoff.

use serde::Serialize;

use crate::models::{AttendanceSummary, Course};
use crate::preferences::Cutoff;

/// Maximum number of further absences that keep `present / total` at or
/// above `cutoff`. Each absence adds one to `total` and nothing to `present`.
///
/// Solves `present / (total + n) >= cutoff / 100` for the largest integer
/// `n`, rounding down.
pub fn skippable_classes(present: u32, total: u32, cutoff: Cutoff) -> u32 {
    if total == 0 {
        return 0;
    }
    let pct = i64::from(cutoff.percent());
    let slack = 100 * i64::from(present) - pct * i64::from(total);
    if slack <= 0 {
        return 0;
    }
    u32::try_from(slack / pct).unwrap_or(u32::MAX)
}

/// Whole-number percentage shown for a course.
pub fn display_percentage(summary: &AttendanceSummary) -> u32 {
    match summary.percentage {
        Some(p) if p.is_finite() && p != 0.0 => p.round().clamp(0.0, 100.0) as u32,
        _ => percentage_of(summary.present, summary.total),
    }
}

/// `round(part / whole * 100)`, or 0 when `whole` is 0.
pub fn percentage_of(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(whole) * 100.0).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Good,
    Average,
    Low,
}

impl AttendanceStatus {
    pub fn classify(percentage: u32, cutoff: Cutoff) -> Self {
        if percentage >= cutoff.percent() {
            AttendanceStatus::Good
        } else if percentage >= 50 {
            AttendanceStatus::Average
        } else {
            AttendanceStatus::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AttendanceStatus::Good => "Good",
            AttendanceStatus::Average => "Average",
            AttendanceStatus::Low => "Low",
        }
    }
}

/// One course's attendance ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseReport {
    pub course_id: String,
    pub name: String,
    pub code: String,
    pub present: u32,
    pub absent: u32,
    pub total: u32,
    pub percentage: u32,
    pub skippable: u32,
    pub status: AttendanceStatus,
    pub cutoff: Cutoff,
}

impl CourseReport {
    pub fn new(course: &Course, summary: &AttendanceSummary, cutoff: Cutoff) -> Self {
        let (mut name, mut code) = (course.name.clone(), course.code.clone());
        if let Some(nested) = &summary.course {
            if !nested.name.is_empty() {
                name = nested.name.clone();
            }
            if !nested.code.is_empty() {
                code = nested.code.clone();
            }
        }

        let percentage = display_percentage(summary);
        Self {
            course_id: course.id.clone(),
            name,
            code,
            present: summary.present,
            absent: summary.absent,
            total: summary.total,
            percentage,
            skippable: skippable_classes(summary.present, summary.total, cutoff),
            status: AttendanceStatus::classify(percentage, cutoff),
            cutoff,
        }
    }

    /// Short advice line, e.g. "Can skip 3 classes".
    pub fn advice(&self) -> Option<String> {
        if self.percentage < self.cutoff.percent() {
            return Some(format!("Attendance below {}", self.cutoff));
        }
        match self.skippable {
            0 => None,
            1 => Some("Can skip 1 class".to_string()),
            n => Some(format!("Can skip {} classes", n)),
        }
    }
}
