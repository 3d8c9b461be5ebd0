//! Child profile, consumed read-only by the planner

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActivityLevel {
    Light,
    Moderate,
    Heavy,
}

/// Liked and disliked terms, matched against recipe tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
}

/// A child the menus are planned for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub id: String,
    pub name: String,
    pub birth_date: NaiveDate,
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: ActivityLevel,
    /// Allergen names, compared case-insensitively with recipe allergens
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub preferences: Preferences,
}

impl ChildProfile {
    /// Age in full years at `today`
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        age_on(self.birth_date, today)
    }
}

/// Full years between `birth` and `today`
///
/// Returns 0 if `today` is before the birth date.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test_case("2017-03-15", "2025-03-14" => 7; "day before birthday")]
    #[test_case("2017-03-15", "2025-03-15" => 8; "on birthday")]
    #[test_case("2017-03-15", "2025-02-20" => 7; "month before")]
    #[test_case("2017-03-15", "2025-12-01" => 8; "after birthday")]
    #[test_case("2017-03-15", "2016-01-01" => 0; "not born")]
    fn age(birth: &str, today: &str) -> u32 {
        age_on(date(birth), date(today))
    }
}
