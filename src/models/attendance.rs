use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Per-course attendance summary as the upstream reports it.
///
/// The upstream spells two fields `totel` and `persantage`; both spellings
/// are accepted and the upstream one is written back out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub present: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub absent: u32,
    #[serde(default, deserialize_with = "null_as_default", rename = "totel", alias = "total")]
    pub total: u32,
    #[serde(default, rename = "persantage", alias = "percentage")]
    pub percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<CourseRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
}

impl AttendanceSummary {
    /// Classes actually held, counted from present and absent marks.
    pub fn marked_classes(&self) -> u32 {
        self.present.saturating_add(self.absent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_counts_read_as_zero() {
        let summary: AttendanceSummary = serde_json::from_str(
            r#"{"present": null, "absent": 2, "totel": 2, "persantage": null,
                "course": {"name": null, "code": "CS201"}}"#,
        )
        .unwrap();
        assert_eq!(summary.present, 0);
        assert_eq!(summary.absent, 2);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.percentage, None);
        let course = summary.course.unwrap();
        assert_eq!(course.name, "");
        assert_eq!(course.code, "CS201");
    }

    #[test]
    fn marked_classes_saturates() {
        let summary = AttendanceSummary {
            present: u32::MAX,
            absent: 1,
            ..Default::default()
        };
        assert_eq!(summary.marked_classes(), u32::MAX);
    }
}
