pub mod dto;
pub mod executor;
pub mod refresh;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{AttendanceSummary, Course, UserProfile};
use crate::session::SessionStore;

pub use dto::LoginResponse;
pub use executor::{ApiRequest, AuthExecutor};
pub use refresh::RefreshGuard;

/// Setting id meaning "all semesters" / "all academic years".
pub const ALL_TERMS: &str = "0";

#[async_trait]
pub trait AttendanceApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> LoginResponse;
    async fn get_courses(&self) -> Result<Vec<Course>, AppError>;
    async fn get_course_attendance(&self, course_id: u64) -> Result<AttendanceSummary, AppError>;
    async fn get_my_profile(&self) -> Result<UserProfile, AppError>;
    async fn set_default_semester(&self, semester_id: &str) -> Result<Value, AppError>;
    async fn set_default_academic_year(&self, academic_year_id: &str) -> Result<Value, AppError>;
    fn is_authenticated(&self) -> bool;
    fn logout(&self);
}

pub struct EzygoClient {
    executor: AuthExecutor,
}

impl EzygoClient {
    pub fn new(config: Config, session: SessionStore) -> Result<Self, AppError> {
        Self::with_guard(config, session, Arc::new(RefreshGuard::new()))
    }

    pub fn with_guard(
        config: Config,
        session: SessionStore,
        guard: Arc<RefreshGuard>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            executor: AuthExecutor::new(config, session, guard)?,
        })
    }

    pub fn executor(&self) -> &AuthExecutor {
        &self.executor
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let url = self.executor.config().endpoint(path);
        let value = self.executor.execute(&ApiRequest::get(url)).await?;
        decode(value)
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<Value, AppError> {
        let url = self.executor.config().endpoint(path);
        self.executor.execute(&ApiRequest::post(url, body)).await
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value).map_err(|e| {
        tracing::error!("Failed to parse: {}", e);
        AppError::Decode(e.to_string())
    })
}

#[async_trait]
impl AttendanceApi for EzygoClient {
    async fn login(&self, username: &str, password: &str) -> LoginResponse {
        self.executor.login(username, password).await
    }

    async fn get_courses(&self) -> Result<Vec<Course>, AppError> {
        let value: Value = self
            .get_json("institutionuser/courses/withusers")
            .await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        decode(value)
    }

    async fn get_course_attendance(&self, course_id: u64) -> Result<AttendanceSummary, AppError> {
        if course_id == 0 {
            return Err(AppError::InvalidCourseId(course_id.to_string()));
        }
        self.get_json(&format!(
            "attendancereports/institutionuser/courses/{}/summery",
            course_id
        ))
        .await
    }

    async fn get_my_profile(&self) -> Result<UserProfile, AppError> {
        self.get_json("myprofile").await
    }

    async fn set_default_semester(&self, semester_id: &str) -> Result<Value, AppError> {
        let body = serde_json::to_value(dto::DefaultSemesterRequest {
            default_semester: semester_id,
        })?;
        self.post_json("user/setting/default_semester", body).await
    }

    async fn set_default_academic_year(&self, academic_year_id: &str) -> Result<Value, AppError> {
        let body = serde_json::to_value(dto::DefaultAcademicYearRequest {
            default_academic_year: academic_year_id,
        })?;
        self.post_json("user/setting/default_academic_year", body)
            .await
    }

    fn is_authenticated(&self) -> bool {
        self.executor.session().has_token()
    }

    fn logout(&self) {
        self.executor.session().logout();
    }
}
