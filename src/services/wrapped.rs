use std::sync::Arc;

use chrono::Datelike;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::ezygo::{ALL_TERMS, AttendanceApi};
use crate::models::{AttendanceSummary, Course};
use crate::projector::{display_percentage, percentage_of};
use crate::services::fetch_attendance_all;

#[derive(Debug, Clone)]
pub struct WrappedEntry {
    pub course: Course,
    pub attendance: Option<AttendanceSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseHighlight {
    pub name: String,
    pub code: String,
    pub percentage: u32,
    pub present: u32,
    pub total: u32,
}

/// Term-wide attendance recap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrappedSummary {
    pub year: i32,
    pub courses_counted: usize,
    pub total_present: u32,
    pub total_absent: u32,
    pub total_classes: u32,
    pub overall_percentage: u32,
    pub absent_share: u32,
    pub average_percentage: u32,
    pub best_course: Option<CourseHighlight>,
    /// Lowest course, skipping 0% courses that have likely not started.
    pub worst_course: Option<CourseHighlight>,
    pub perfect_courses: Vec<String>,
    pub comparison: String,
}

impl WrappedSummary {
    pub fn from_courses(entries: &[WrappedEntry], year: i32) -> Self {
        // Courses without any marked class have not been set up upstream.
        let counted: Vec<(&Course, &AttendanceSummary, u32)> = entries
            .iter()
            .filter_map(|entry| {
                let summary = entry.attendance.as_ref()?;
                (summary.marked_classes() > 0)
                    .then(|| (&entry.course, summary, display_percentage(summary)))
            })
            .collect();

        let total_present = saturating_sum(counted.iter().map(|(_, s, _)| s.present));
        let total_absent = saturating_sum(counted.iter().map(|(_, s, _)| s.absent));
        let total_classes = total_present.saturating_add(total_absent);

        let average_percentage = if counted.is_empty() {
            0
        } else {
            let sum = saturating_sum(counted.iter().map(|(_, _, p)| *p));
            (f64::from(sum) / counted.len() as f64).round() as u32
        };

        let mut best: Option<&(&Course, &AttendanceSummary, u32)> = None;
        let mut worst: Option<&(&Course, &AttendanceSummary, u32)> = None;
        for entry in &counted {
            if best.is_none_or(|b| entry.2 > b.2) {
                best = Some(entry);
            }
            if entry.2 > 0 && worst.is_none_or(|w| entry.2 < w.2) {
                worst = Some(entry);
            }
        }

        let perfect_courses = counted
            .iter()
            .filter(|(_, _, p)| *p >= 100)
            .map(|(course, summary, _)| course_name(course, summary))
            .collect();

        let best_course = best.map(|(c, s, p)| highlight(c, s, *p));
        let comparison = fun_comparison(best_course.as_ref().map_or(0, |b| b.percentage));

        Self {
            year,
            courses_counted: counted.len(),
            total_present,
            total_absent,
            total_classes,
            overall_percentage: percentage_of(total_present, total_classes),
            absent_share: percentage_of(total_absent, total_classes),
            average_percentage,
            best_course,
            worst_course: worst.map(|(c, s, p)| highlight(c, s, *p)),
            perfect_courses,
            comparison: comparison.to_string(),
        }
    }
}

fn saturating_sum(values: impl Iterator<Item = u32>) -> u32 {
    values.fold(0, u32::saturating_add)
}

fn course_name(course: &Course, summary: &AttendanceSummary) -> String {
    summary
        .course
        .as_ref()
        .map(|c| c.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| course.name.clone())
}

fn highlight(course: &Course, summary: &AttendanceSummary, percentage: u32) -> CourseHighlight {
    let code = summary
        .course
        .as_ref()
        .map(|c| c.code.clone())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| course.code.clone());
    CourseHighlight {
        name: course_name(course, summary),
        code,
        percentage,
        present: summary.present,
        total: summary.total,
    }
}

pub fn fun_comparison(percentage: u32) -> &'static str {
    match percentage {
        95.. => "like a superhero who never misses a call to action!",
        90..=94 => "impressive! Even the WiFi gets jealous of your connection.",
        80..=89 => "solid! Like a dependable friend who's always there.",
        70..=79 => "decent, like showing up to most of the family dinners.",
        60..=69 => "like a part-time job - present enough to get by.",
        _ => "a bit like a ghost story - more rumor than reality.",
    }
}

pub struct WrappedService {
    api: Arc<dyn AttendanceApi>,
}

impl WrappedService {
    pub fn new(api: Arc<dyn AttendanceApi>) -> Self {
        Self { api }
    }

    /// Widens the upstream view to every term, then pulls attendance for all
    /// courses. A course whose attendance fails to load is kept without it.
    pub async fn collect(&self) -> Result<Vec<WrappedEntry>, AppError> {
        if !self.api.is_authenticated() {
            return Err(AppError::Unauthenticated);
        }

        self.api.set_default_semester(ALL_TERMS).await?;
        self.api.set_default_academic_year(ALL_TERMS).await?;

        let courses = self.api.get_courses().await?;
        let results = fetch_attendance_all(&self.api, &courses).await;

        let entries: Vec<WrappedEntry> = courses
            .into_iter()
            .zip(results)
            .map(|(course, result)| {
                let attendance = result
                    .map_err(|e| warn!("skipping attendance for course {}: {}", course.id, e))
                    .ok();
                WrappedEntry { course, attendance }
            })
            .collect();

        info!("collected {} courses for wrapped", entries.len());
        Ok(entries)
    }

    pub async fn summarize(&self) -> Result<WrappedSummary, AppError> {
        let entries = self.collect().await?;
        Ok(WrappedSummary::from_courses(
            &entries,
            chrono::Local::now().year(),
        ))
    }
}
