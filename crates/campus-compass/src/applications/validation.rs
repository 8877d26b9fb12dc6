use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use super::domain::{ScholarshipApplication, UniversityApplication};

/// Field name to message, holding only the currently failing fields.
pub type ValidationErrorMap = BTreeMap<&'static str, String>;

type Accessor<F> = fn(&F) -> &str;

const EMAIL_MESSAGE: &str = "Please enter a valid email address";
const PHONE_MESSAGE: &str = "Please enter a valid phone number";
const GPA_MESSAGE: &str = "GPA should be between 0 and 4";
const GPA_MAX: f64 = 4.0;
pub const ESSAY_MIN_CHARS: usize = 100;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("valid phone pattern"))
}

pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    phone_pattern().is_match(value)
}

/// Blank input is treated as absent; anything else must be a finite number in [0, 4].
pub fn is_valid_gpa(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return true;
    }

    trimmed
        .parse::<f64>()
        .map(|gpa| gpa.is_finite() && (0.0..=GPA_MAX).contains(&gpa))
        .unwrap_or(false)
}

struct RequiredField<F> {
    field: &'static str,
    message: &'static str,
    accessor: Accessor<F>,
}

struct MinLengthField<F> {
    field: &'static str,
    min_chars: usize,
    accessor: Accessor<F>,
}

/// Declarative rule set for one form type.
///
/// Checks run in a fixed order: required, email, phone, GPA, minimum length.
/// A later failing check replaces the message of an earlier one for the same field.
pub struct ValidationRules<F> {
    required: Vec<RequiredField<F>>,
    email: Option<(&'static str, Accessor<F>)>,
    phone: Option<(&'static str, Accessor<F>)>,
    gpa: Option<(&'static str, Accessor<F>)>,
    min_length: Vec<MinLengthField<F>>,
}

impl<F> Default for ValidationRules<F> {
    fn default() -> Self {
        Self {
            required: Vec::new(),
            email: None,
            phone: None,
            gpa: None,
            min_length: Vec::new(),
        }
    }
}

impl<F> std::fmt::Debug for ValidationRules<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationRules")
            .field("required", &self.required_fields().collect::<Vec<_>>())
            .field("email", &self.email.map(|(field, _)| field))
            .field("phone", &self.phone.map(|(field, _)| field))
            .field("gpa", &self.gpa.map(|(field, _)| field))
            .field(
                "min_length",
                &self
                    .min_length
                    .iter()
                    .map(|rule| (rule.field, rule.min_chars))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<F> ValidationRules<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(
        mut self,
        field: &'static str,
        message: &'static str,
        accessor: Accessor<F>,
    ) -> Self {
        self.required.push(RequiredField {
            field,
            message,
            accessor,
        });
        self
    }

    pub fn email(mut self, field: &'static str, accessor: Accessor<F>) -> Self {
        self.email = Some((field, accessor));
        self
    }

    pub fn phone(mut self, field: &'static str, accessor: Accessor<F>) -> Self {
        self.phone = Some((field, accessor));
        self
    }

    pub fn gpa(mut self, field: &'static str, accessor: Accessor<F>) -> Self {
        self.gpa = Some((field, accessor));
        self
    }

    pub fn min_length(
        mut self,
        field: &'static str,
        min_chars: usize,
        accessor: Accessor<F>,
    ) -> Self {
        self.min_length.push(MinLengthField {
            field,
            min_chars,
            accessor,
        });
        self
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.required.iter().map(|rule| rule.field)
    }

    pub fn validate(&self, form: &F) -> ValidationErrorMap {
        let mut errors = ValidationErrorMap::new();

        for rule in &self.required {
            if (rule.accessor)(form).trim().is_empty() {
                errors.insert(rule.field, rule.message.to_string());
            }
        }

        if let Some((field, accessor)) = self.email {
            let value = accessor(form);
            if !value.is_empty() && !is_valid_email(value) {
                errors.insert(field, EMAIL_MESSAGE.to_string());
            }
        }

        if let Some((field, accessor)) = self.phone {
            let value = accessor(form);
            if !value.is_empty() && !is_valid_phone(value) {
                errors.insert(field, PHONE_MESSAGE.to_string());
            }
        }

        if let Some((field, accessor)) = self.gpa {
            if !is_valid_gpa(accessor(form)) {
                errors.insert(field, GPA_MESSAGE.to_string());
            }
        }

        // Raw character count, untrimmed, matching the counter shown next to the field.
        for rule in &self.min_length {
            let value = (rule.accessor)(form);
            if !value.is_empty() && value.chars().count() < rule.min_chars {
                errors.insert(
                    rule.field,
                    format!("Please provide at least {} characters", rule.min_chars),
                );
            }
        }

        errors
    }
}

pub fn university_rules() -> ValidationRules<UniversityApplication> {
    ValidationRules::<UniversityApplication>::new()
        .require("firstName", "First name is required", |f| f.first_name.as_str())
        .require("lastName", "Last name is required", |f| f.last_name.as_str())
        .require("email", "Email is required", |f| f.email.as_str())
        .require("phone", "Phone number is required", |f| f.phone.as_str())
        .require("dateOfBirth", "Date of birth is required", |f| {
            f.date_of_birth.as_str()
        })
        .require("nationality", "Nationality is required", |f| f.nationality.as_str())
        .require(
            "currentEducationLevel",
            "Current education level is required",
            |f| f.current_education_level.as_str(),
        )
        .require("desiredProgram", "Desired program is required", |f| {
            f.desired_program.as_str()
        })
        .email("email", |f| f.email.as_str())
        .phone("phone", |f| f.phone.as_str())
        .gpa("currentGPA", |f| f.current_gpa.as_str())
}

pub fn scholarship_rules() -> ValidationRules<ScholarshipApplication> {
    ValidationRules::<ScholarshipApplication>::new()
        .require("firstName", "First name is required", |f| f.first_name.as_str())
        .require("lastName", "Last name is required", |f| f.last_name.as_str())
        .require("email", "Email is required", |f| f.email.as_str())
        .require("phone", "Phone number is required", |f| f.phone.as_str())
        .require("dateOfBirth", "Date of birth is required", |f| {
            f.date_of_birth.as_str()
        })
        .require("nationality", "Nationality is required", |f| f.nationality.as_str())
        .require(
            "currentEducationLevel",
            "Current education level is required",
            |f| f.current_education_level.as_str(),
        )
        .require("fieldOfStudy", "Field of study is required", |f| {
            f.field_of_study.as_str()
        })
        .require(
            "whyDeserve",
            "Please explain why you deserve this scholarship",
            |f| f.why_deserve.as_str(),
        )
        .require("careerGoals", "Please describe your career goals", |f| {
            f.career_goals.as_str()
        })
        .email("email", |f| f.email.as_str())
        .phone("phone", |f| f.phone.as_str())
        .gpa("currentGPA", |f| f.current_gpa.as_str())
        .min_length("whyDeserve", ESSAY_MIN_CHARS, |f| f.why_deserve.as_str())
        .min_length("careerGoals", ESSAY_MIN_CHARS, |f| f.career_goals.as_str())
}
