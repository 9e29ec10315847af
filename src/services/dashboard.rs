use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::ezygo::AttendanceApi;
use crate::models::{Course, UserProfile};
use crate::preferences::Cutoff;
use crate::projector::CourseReport;
use crate::services::fetch_attendance_all;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub profile: Option<UserProfile>,
    pub cutoff: Cutoff,
    pub cards: Vec<CourseCard>,
}

#[derive(Debug, Serialize)]
pub struct CourseCard {
    pub course: Course,
    #[serde(flatten)]
    pub state: CardState,
}

/// Each card loads on its own; one failing course does not hide the others.
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CardState {
    Ready { report: CourseReport },
    Failed { error: String },
}

impl Dashboard {
    pub fn reports(&self) -> impl Iterator<Item = &CourseReport> {
        self.cards.iter().filter_map(|card| match &card.state {
            CardState::Ready { report } => Some(report),
            CardState::Failed { .. } => None,
        })
    }
}

pub struct DashboardService {
    api: Arc<dyn AttendanceApi>,
}

impl DashboardService {
    pub fn new(api: Arc<dyn AttendanceApi>) -> Self {
        Self { api }
    }

    pub async fn load(&self, cutoff: Cutoff) -> Result<Dashboard, AppError> {
        if !self.api.is_authenticated() {
            return Err(AppError::Unauthenticated);
        }

        let (profile, courses) = tokio::join!(self.api.get_my_profile(), self.api.get_courses());

        let profile = match profile {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("Error fetching user profile: {}", e);
                None
            }
        };
        let courses = courses?;
        info!("loaded {} courses", courses.len());

        let results = fetch_attendance_all(&self.api, &courses).await;
        let cards = courses
            .into_iter()
            .zip(results)
            .map(|(course, result)| {
                let state = match result {
                    Ok(summary) => CardState::Ready {
                        report: CourseReport::new(&course, &summary, cutoff),
                    },
                    Err(e) => {
                        warn!("attendance for course {} failed: {}", course.id, e);
                        CardState::Failed {
                            error: e.to_string(),
                        }
                    }
                };
                CourseCard { course, state }
            })
            .collect();

        Ok(Dashboard {
            profile,
            cutoff,
            cards,
        })
    }
}
