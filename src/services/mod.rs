pub mod dashboard;
pub mod wrapped;

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::error;

use crate::error::AppError;
use crate::ezygo::AttendanceApi;
use crate::models::{AttendanceSummary, Course};

pub use dashboard::{CardState, CourseCard, Dashboard, DashboardService};
pub use wrapped::{WrappedEntry, WrappedService, WrappedSummary};

/// Fetches every course's attendance as its own task. Results come back in
/// the same order as `courses`.
pub(crate) async fn fetch_attendance_all(
    api: &Arc<dyn AttendanceApi>,
    courses: &[Course],
) -> Vec<Result<AttendanceSummary, AppError>> {
    let mut tasks = JoinSet::new();
    for (index, course) in courses.iter().enumerate() {
        let api = Arc::clone(api);
        let course_id = course.numeric_id();
        let raw_id = course.id.clone();
        tasks.spawn(async move {
            let result = match course_id {
                Some(id) => api.get_course_attendance(id).await,
                None => Err(AppError::InvalidCourseId(raw_id)),
            };
            (index, result)
        });
    }

    let mut results: Vec<Option<Result<AttendanceSummary, AppError>>> =
        courses.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(e) => error!("attendance task failed: {}", e),
        }
    }

    results
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| Err(AppError::Network("attendance task aborted".to_string())))
        })
        .collect()
}
