use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A raw procurement notice as stored in the `boamp_notices` table.
///
/// Every column arrives as optional text; typed interpretation (dates,
/// delimited lists, embedded JSON) happens downstream, never here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub idweb: Option<String>,
    pub id: Option<String>,
    pub objet: Option<String>,
    pub nomacheteur: Option<String>,
    pub dateparution: Option<String>,
    pub datelimitereponse: Option<String>,
    pub datefindiffusion: Option<String>,
    pub famille: Option<String>,
    pub code_departement: Option<String>,
    pub type_procedure: Option<String>,
    pub nature: Option<String>,
    pub keywords_used: Option<String>,
    pub visite_obligatoire: Option<String>,
    pub dce_link: Option<String>,
    pub lot_numbers: Option<String>,
    pub gestion: Option<String>,
    pub donnees: Option<String>,
}

/// Severity tier of a notice deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineClass {
    Neutral,
    Overdue,
    Urgent,
    Warning,
    Ok,
}

impl DeadlineClass {
    /// CSS token used by the presentation layer
    pub fn css_class(&self) -> &'static str {
        match self {
            DeadlineClass::Neutral => "deadline-neutral",
            DeadlineClass::Overdue => "deadline-overdue",
            DeadlineClass::Urgent => "deadline-urgent",
            DeadlineClass::Warning => "deadline-warning",
            DeadlineClass::Ok => "deadline-ok",
        }
    }
}

/// Which source column supplied the deadline date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeadlineField {
    #[serde(rename = "datelimitereponse")]
    DateLimiteReponse,
    #[serde(rename = "datefindiffusion")]
    DateFinDiffusion,
}

impl DeadlineField {
    pub fn column(&self) -> &'static str {
        match self {
            DeadlineField::DateLimiteReponse => "datelimitereponse",
            DeadlineField::DateFinDiffusion => "datefindiffusion",
        }
    }
}

/// Derived deadline record for a notice.
///
/// Either no date was found and everything is in its neutral state, or one
/// date was found and every field is populated from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadlineInfo {
    pub deadline_date: Option<NaiveDate>,
    pub deadline_field: Option<DeadlineField>,
    pub days_remaining: Option<i64>,
    pub is_urgent: bool,
    pub is_overdue: bool,
    pub deadline_text: String,
    pub deadline_class: DeadlineClass,
}

impl DeadlineInfo {
    /// The record returned when no candidate date parses
    pub fn neutral() -> Self {
        Self {
            deadline_date: None,
            deadline_field: None,
            days_remaining: None,
            is_urgent: false,
            is_overdue: false,
            deadline_text: "No deadline".to_string(),
            deadline_class: DeadlineClass::Neutral,
        }
    }
}

impl Default for DeadlineInfo {
    fn default() -> Self {
        Self::neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_record() {
        let info = DeadlineInfo::neutral();
        assert_eq!(info.deadline_date, None);
        assert_eq!(info.deadline_field, None);
        assert_eq!(info.days_remaining, None);
        assert!(!info.is_urgent);
        assert!(!info.is_overdue);
        assert_eq!(info.deadline_text, "No deadline");
        assert_eq!(info.deadline_class, DeadlineClass::Neutral);
    }

    #[test]
    fn test_class_serialization() {
        assert_eq!(
            serde_json::to_string(&DeadlineClass::Overdue).unwrap(),
            "\"overdue\""
        );
        assert_eq!(DeadlineClass::Urgent.css_class(), "deadline-urgent");
    }

    #[test]
    fn test_field_serialization() {
        assert_eq!(
            serde_json::to_string(&DeadlineField::DateLimiteReponse).unwrap(),
            "\"datelimitereponse\""
        );
        assert_eq!(DeadlineField::DateFinDiffusion.column(), "datefindiffusion");
    }
}
