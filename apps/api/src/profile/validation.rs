use serde::{Deserialize, Serialize};

use crate::profile::fields;
use crate::profile::models::ProfileDocument;

/// One field-level problem, addressed by a dotted path such as `education[0].end_year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: String, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn require(errors: &mut Vec<FieldError>, path: String, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(path, "is required"));
    }
}

/// Loose address check: `local@domain.tld`, no whitespace.
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Validates a document before it is persisted. Drafts may be inconsistent; storage may not.
///
/// Checks:
/// - required names (institution, designation, organization, title, skill name)
/// - `end_year >= start_year`, `end_date >= start_date` for closed ranges
/// - email shape when an email is present
/// - project links are absolute http(s) URLs
pub fn validate_profile(doc: &ProfileDocument) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    for (i, e) in doc.education.iter().enumerate() {
        require(&mut errors, format!("education[{i}].institution"), &e.institution);
        if let (Some(start), Some(end)) = (e.start_year, e.end_year) {
            if end < start {
                errors.push(FieldError::new(
                    format!("education[{i}].end_year"),
                    format!("must not be before start_year ({start})"),
                ));
            }
        }
    }

    for (i, w) in doc.work_experiences.iter().enumerate() {
        require(&mut errors, format!("work_experiences[{i}].designation"), &w.designation);
        require(&mut errors, format!("work_experiences[{i}].organization"), &w.organization);
        if let (false, Some(start), Some(end)) = (w.currently_working, w.start_date, w.end_date) {
            if end < start {
                errors.push(FieldError::new(
                    format!("work_experiences[{i}].end_date"),
                    format!("must not be before start_date ({start})"),
                ));
            }
        }
    }

    for (i, p) in doc.academic_projects.iter().enumerate() {
        require(&mut errors, format!("academic_projects[{i}].title"), &p.title);
        if let (false, Some(start), Some(end)) = (p.currently_ongoing, p.start_date, p.end_date) {
            if end < start {
                errors.push(FieldError::new(
                    format!("academic_projects[{i}].end_date"),
                    format!("must not be before start_date ({start})"),
                ));
            }
        }
        if let Some(link) = &p.project_link {
            let as_json = serde_json::Value::String(link.clone());
            if fields::link(&as_json).is_err() {
                errors.push(FieldError::new(
                    format!("academic_projects[{i}].project_link"),
                    "must be an http(s) URL",
                ));
            }
        }
    }

    for (i, s) in doc.skills.iter().enumerate() {
        require(&mut errors, format!("skills[{i}].name"), &s.name);
    }

    let email = doc.profile_details.email.trim();
    if !email.is_empty() && !looks_like_email(email) {
        errors.push(FieldError::new(
            "profile_details.email".to_string(),
            "is not a valid email address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
