//! Plain-text views of the dashboard, course list and wrapped summary.

use std::fmt::Write;

use crate::models::{Course, UserProfile};
use crate::projector::{AttendanceStatus, CourseReport};
use crate::services::{CardState, Dashboard, WrappedSummary};

const BAR_WIDTH: usize = 20;

pub fn progress_bar(percentage: u32) -> String {
    let filled = (percentage.min(100) as usize * BAR_WIDTH + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn course_list(courses: &[Course]) -> String {
    if courses.is_empty() {
        return "No courses found.\n".to_string();
    }
    let mut out = String::new();
    for course in courses {
        let _ = writeln!(
            out,
            "{:>6}  {:<10}  {}  ({})",
            course.id, course.code, course.name, course.academic_year
        );
    }
    out
}

pub fn report(report: &CourseReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", report.name, report.code);
    let _ = writeln!(
        out,
        "  {} {:>3}%  {}",
        progress_bar(report.percentage),
        report.percentage,
        report.status.label()
    );
    let _ = writeln!(
        out,
        "  present {}  absent {}  total {}",
        report.present, report.absent, report.total
    );
    if let Some(advice) = report.advice() {
        let _ = writeln!(out, "  {}", advice);
    }
    out
}

pub fn profile(profile: &UserProfile) -> String {
    let mut out = String::new();
    let name = profile.display_name();
    let _ = writeln!(out, "{}", if name.is_empty() { "(no name)" } else { name.as_str() });
    if let Some(email) = &profile.email {
        let _ = writeln!(out, "  email: {}", email);
    }
    if let Some(phone) = &profile.phone {
        let _ = writeln!(out, "  phone: {}", phone);
    }
    out
}

pub fn dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    match &dashboard.profile {
        Some(p) if !p.display_name().is_empty() => {
            let _ = writeln!(out, "Hi, {}", p.display_name());
        }
        _ => {}
    }
    let _ = writeln!(out, "Your courses (cutoff {})", dashboard.cutoff);
    let _ = writeln!(out);

    if dashboard.cards.is_empty() {
        let _ = writeln!(out, "No courses found.");
        return out;
    }

    for card in &dashboard.cards {
        match &card.state {
            CardState::Ready { report: r } => out.push_str(&report(r)),
            CardState::Failed { error } => {
                let _ = writeln!(out, "{} [{}]", card.course.name, card.course.code);
                let _ = writeln!(out, "  {}", error);
            }
        }
        let _ = writeln!(out);
    }

    let (mut good, mut average, mut low) = (0, 0, 0);
    for r in dashboard.reports() {
        match r.status {
            AttendanceStatus::Good => good += 1,
            AttendanceStatus::Average => average += 1,
            AttendanceStatus::Low => low += 1,
        }
    }
    let _ = writeln!(out, "Good {}  Average {}  Low {}", good, average, low);
    out
}

pub fn wrapped(summary: &WrappedSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Your academic journey in {}", summary.year);
    let _ = writeln!(out);

    if summary.courses_counted == 0 {
        let _ = writeln!(out, "No attendance recorded yet.");
        return out;
    }

    let _ = writeln!(
        out,
        "{} classes across {} courses, {}% attended",
        summary.total_classes, summary.courses_counted, summary.overall_percentage
    );
    let _ = writeln!(
        out,
        "Missed {} classes ({}% of the total)",
        summary.total_absent, summary.absent_share
    );
    let _ = writeln!(out, "Average attendance: {}%", summary.average_percentage);

    if let Some(best) = &summary.best_course {
        let _ = writeln!(out);
        let _ = writeln!(out, "Top course: {} ({}%)", best.name, best.percentage);
        let _ = writeln!(out, "  {} of {} classes", best.present, best.total);
        let _ = writeln!(out, "  You're {}", summary.comparison);
    }

    if let Some(worst) = &summary.worst_course {
        let _ = writeln!(out, "Needs attention: {} ({}%)", worst.name, worst.percentage);
    }

    if !summary.perfect_courses.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Perfect attendance:");
        for name in summary.perfect_courses.iter().take(3) {
            let _ = writeln!(out, "  {}", name.to_lowercase());
        }
        if summary.perfect_courses.len() > 3 {
            let _ = writeln!(out, "  + {} more", summary.perfect_courses.len() - 3);
        }
    }
    out
}
