use serde::{Deserialize, Deserializer, Serialize};

use super::null_as_default;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub academic_year: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub start_year: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub end_year: String,
}

impl Course {
    /// Numeric id used by the attendance endpoint.
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.trim().parse::<u64>().ok().filter(|id| *id > 0)
    }
}

/// Upstream sends ids and years as either JSON strings or numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
        Raw::Null => String::new(),
    })
}
