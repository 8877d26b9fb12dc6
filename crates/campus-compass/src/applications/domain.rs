use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::validation::{scholarship_rules, university_rules, ValidationRules};

/// A form type with one fixed rule set.
pub trait ApplicationForm: Clone + Default + Serialize + Send + Sync + 'static {
    fn rules() -> &'static ValidationRules<Self>;
    fn applicant_name(&self) -> String;
    fn applicant_email(&self) -> &str;
}

/// Documents attached to a university application, carried as file names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UniversityDocuments {
    pub transcript: Option<String>,
    pub passport: Option<String>,
    pub english_proficiency: Option<String>,
    pub sop: Option<String>,
    pub cv: Option<String>,
}

/// Application to one university program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UniversityApplication {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub nationality: String,
    pub passport_number: String,

    pub current_education_level: String,
    pub current_institution: String,
    #[serde(rename = "currentGPA")]
    pub current_gpa: String,
    pub previous_degree: String,
    pub graduation_year: String,

    pub desired_program: String,
    pub intake_preference: String,
    pub campus_preference: String,

    pub english_test: String,
    pub english_score: String,
    pub test_date: String,

    pub work_experience: String,
    pub extracurriculars: String,
    pub statement_of_purpose: String,
    pub additional_info: String,

    pub documents: UniversityDocuments,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AcademicReference {
    pub name: String,
    pub email: String,
    pub position: String,
    pub institution: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfessionalReference {
    pub name: String,
    pub email: String,
    pub position: String,
    pub organization: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct References {
    pub academic: AcademicReference,
    pub professional: ProfessionalReference,
}

/// Documents attached to a scholarship application, carried as file names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScholarshipDocuments {
    pub transcript: Option<String>,
    pub essay: Option<String>,
    pub recommendation: Option<String>,
    pub financial: Option<String>,
    pub passport: Option<String>,
}

/// Application for one scholarship, including essays and references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScholarshipApplication {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub nationality: String,
    pub address: String,

    pub current_education_level: String,
    pub current_institution: String,
    pub field_of_study: String,
    #[serde(rename = "currentGPA")]
    pub current_gpa: String,
    pub previous_degree: String,
    pub graduation_year: String,

    pub family_income: String,
    pub current_funding: String,
    pub funding_gap: String,

    pub why_deserve: String,
    pub career_goals: String,
    pub contribution_plans: String,
    pub leadership_experience: String,
    pub challenges: String,

    pub extracurriculars: String,
    pub volunteering: String,
    pub achievements: String,

    pub references: References,
    pub documents: ScholarshipDocuments,
}

impl ApplicationForm for UniversityApplication {
    fn rules() -> &'static ValidationRules<Self> {
        static RULES: OnceLock<ValidationRules<UniversityApplication>> = OnceLock::new();
        RULES.get_or_init(university_rules)
    }

    fn applicant_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    fn applicant_email(&self) -> &str {
        self.email.trim()
    }
}

impl ApplicationForm for ScholarshipApplication {
    fn rules() -> &'static ValidationRules<Self> {
        static RULES: OnceLock<ValidationRules<ScholarshipApplication>> = OnceLock::new();
        RULES.get_or_init(scholarship_rules)
    }

    fn applicant_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    fn applicant_email(&self) -> &str {
        self.email.trim()
    }
}

/// What an application is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ApplicationTarget {
    University(u32),
    Scholarship(u32),
}

impl ApplicationTarget {
    pub fn id(self) -> u32 {
        match self {
            Self::University(id) | Self::Scholarship(id) => id,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::University(_) => "university",
            Self::Scholarship(_) => "scholarship",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn forms_accept_partial_camel_case_payloads() {
        let form: ScholarshipApplication = serde_json::from_value(json!({
            "firstName": "Amara",
            "currentGPA": "3.7",
            "references": { "academic": { "name": "Dr. Okafor" } },
            "documents": { "transcript": "transcript.pdf" }
        }))
        .expect("payload parses");

        assert_eq!(form.first_name, "Amara");
        assert_eq!(form.current_gpa, "3.7");
        assert_eq!(form.references.academic.name, "Dr. Okafor");
        assert!(form.references.professional.name.is_empty());
        assert_eq!(form.documents.transcript.as_deref(), Some("transcript.pdf"));
        assert_eq!(form.documents.passport, None);
    }

    #[test]
    fn targets_expose_id_and_label() {
        let target = ApplicationTarget::Scholarship(4);
        assert_eq!(target.id(), 4);
        assert_eq!(target.label(), "scholarship");
        assert_eq!(
            serde_json::to_value(target).expect("serializes"),
            json!({ "kind": "scholarship", "id": 4 })
        );
    }
}
