// src/types/user.rs
//! Resume input model decoded from the JSON sent by the CLI or the HTTP API

use serde::{Deserialize, Serialize};

// ===== Resume JSON Structure =====

/// One resume. Every field is optional on the wire: missing values decode to
/// empty strings and empty lists, unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub website: String,
    pub linkedin: String,
    pub github: String,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<SkillGroup>,
    pub projects: Vec<Project>,
    pub languages: Vec<Language>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String, // empty means current
    pub description: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub name: String,
    pub level: String,
}

/// Format a `start - end` range the way every dated entry prints it.
///
/// An entry with only a start date is still running and ends at "Present";
/// an entry with neither date yields `None` so callers can omit the line.
pub fn date_range(start: &str, end: &str) -> Option<String> {
    match (start.trim(), end.trim()) {
        ("", "") => None,
        (start, "") => Some(format!("{} - Present", start)),
        ("", end) => Some(end.to_string()),
        (start, end) => Some(format!("{} - {}", start, end)),
    }
}

impl Experience {
    pub fn date_range(&self) -> Option<String> {
        date_range(&self.start_date, &self.end_date)
    }
}

impl Education {
    pub fn date_range(&self) -> Option<String> {
        date_range(&self.start_date, &self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_minimal_user() {
        let user: User = serde_json::from_str(
            r#"{"name":"Jane Doe", "experience":[{"title":"Engineer","company":"Acme"}]}"#,
        )
        .unwrap();

        assert_eq!(user.name, "Jane Doe");
        assert_eq!(user.email, "");
        assert_eq!(user.experience.len(), 1);
        assert_eq!(user.experience[0].company, "Acme");
        assert!(user.experience[0].highlights.is_empty());
        assert!(user.education.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let user: User =
            serde_json::from_str(r#"{"name":"Jane","favourite_color":"blue"}"#).unwrap();
        assert_eq!(user.name, "Jane");
    }

    #[test]
    fn test_empty_object_decodes_to_default() {
        let user: User = serde_json::from_str("{}").unwrap();
        assert_eq!(user, User::default());
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(serde_json::from_str::<User>("not-json").is_err());
        assert!(serde_json::from_str::<User>(r#"{"name": 42}"#).is_err());
    }

    #[test]
    fn test_date_range() {
        assert_eq!(date_range("2020", "2023"), Some("2020 - 2023".to_string()));
        assert_eq!(date_range("2020", ""), Some("2020 - Present".to_string()));
        assert_eq!(date_range("", "2019"), Some("2019".to_string()));
        assert_eq!(date_range(" ", ""), None);
    }
}
