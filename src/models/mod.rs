pub mod attendance;
pub mod course;
pub mod profile;

pub use attendance::{AttendanceSummary, CourseRef};
pub use course::Course;
pub use profile::UserProfile;

use serde::{Deserialize, Deserializer};

/// Reads an explicit JSON `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
