use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Login result. HTTP and network failures are folded into `message`
/// instead of being returned as errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

impl LoginResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            access_token: None,
            message: Some(message.into()),
            success: Some(false),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_success(&self) -> bool {
        self.token().is_some()
    }

    /// Server message, or a generic fallback.
    pub fn error_message(&self) -> &str {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or("Login failed")
    }
}

#[derive(Debug, Serialize)]
pub struct DefaultSemesterRequest<'a> {
    pub default_semester: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DefaultAcademicYearRequest<'a> {
    pub default_academic_year: &'a str,
}
