//! Section editors: append / update / remove / list over each repeatable collection.
//!
//! Every operation takes the prior document by reference and returns the next one.
//! A failed operation leaves the caller's document exactly as it was.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::profile::fields::{self, CoerceError};
use crate::profile::models::{
    EducationEntry, ProfileDetails, ProfileDocument, ProjectEntry, SkillEntry,
    WorkExperienceEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Education,
    WorkExperiences,
    AcademicProjects,
    Skills,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Education => "education",
            Section::WorkExperiences => "work_experiences",
            Section::AcademicProjects => "academic_projects",
            Section::Skills => "skills",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editor failures. `IndexOutOfRange` means the caller holds a stale index; it is a bug
/// signal, not something to show a candidate.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SectionError {
    #[error("index {index} out of range for {scope} (len {len})")]
    IndexOutOfRange {
        scope: &'static str,
        index: usize,
        len: usize,
    },

    #[error("unknown field '{field}' for {scope}")]
    UnknownField { scope: &'static str, field: String },

    #[error("invalid value for '{field}': {source}")]
    InvalidFieldValue {
        field: String,
        #[source]
        source: CoerceError,
    },
}

fn invalid(field: &str) -> impl FnOnce(CoerceError) -> SectionError + '_ {
    move |source| SectionError::InvalidFieldValue {
        field: field.to_string(),
        source,
    }
}

/// One entry of a repeatable section.
pub trait SectionEntry: Clone + Default + Serialize {
    const SECTION: Section;
    /// Accepted field names, in canonical schema order.
    const FIELDS: &'static [&'static str];

    /// Coerces `value` into `field`. Leaves the entry untouched on error.
    fn set_field(&mut self, field: &str, value: &Value) -> Result<(), SectionError>;

    /// Re-establishes cross-field invariants after a mutation.
    fn normalize(&mut self) {}

    /// True when the entry carries no candidate-supplied content.
    fn is_blank(&self) -> bool;

    fn unknown(field: &str) -> SectionError {
        SectionError::UnknownField {
            scope: Self::SECTION.as_str(),
            field: field.to_string(),
        }
    }
}

impl SectionEntry for EducationEntry {
    const SECTION: Section = Section::Education;
    const FIELDS: &'static [&'static str] = &[
        "institution",
        "degree",
        "stream",
        "start_year",
        "end_year",
        "performance_type",
        "performance_score",
    ];

    fn set_field(&mut self, field: &str, value: &Value) -> Result<(), SectionError> {
        match field {
            "institution" => self.institution = fields::text(value).map_err(invalid(field))?,
            "degree" => self.degree = fields::text(value).map_err(invalid(field))?,
            "stream" => self.stream = fields::text(value).map_err(invalid(field))?,
            "start_year" => self.start_year = fields::year(value).map_err(invalid(field))?,
            "end_year" => self.end_year = fields::year(value).map_err(invalid(field))?,
            "performance_type" => {
                self.performance_type = fields::choice(value).map_err(invalid(field))?
            }
            "performance_score" => {
                self.performance_score = fields::score(value).map_err(invalid(field))?
            }
            _ => return Err(Self::unknown(field)),
        }
        Ok(())
    }

    fn is_blank(&self) -> bool {
        self.institution.is_empty()
            && self.degree.is_empty()
            && self.stream.is_empty()
            && self.start_year.is_none()
            && self.end_year.is_none()
            && self.performance_score.is_none()
    }
}

impl SectionEntry for WorkExperienceEntry {
    const SECTION: Section = Section::WorkExperiences;
    const FIELDS: &'static [&'static str] = &[
        "type",
        "designation",
        "organization",
        "location",
        "location_type",
        "start_date",
        "end_date",
        "currently_working",
        "description",
    ];

    fn set_field(&mut self, field: &str, value: &Value) -> Result<(), SectionError> {
        match field {
            "type" => self.work_type = fields::choice(value).map_err(invalid(field))?,
            "designation" => self.designation = fields::text(value).map_err(invalid(field))?,
            "organization" => self.organization = fields::text(value).map_err(invalid(field))?,
            "location" => self.location = fields::text(value).map_err(invalid(field))?,
            "location_type" => {
                self.location_type = fields::choice(value).map_err(invalid(field))?
            }
            "start_date" => self.start_date = fields::date(value).map_err(invalid(field))?,
            "end_date" => self.end_date = fields::date(value).map_err(invalid(field))?,
            "currently_working" => {
                self.currently_working = fields::flag(value).map_err(invalid(field))?
            }
            "description" => self.description = fields::text(value).map_err(invalid(field))?,
            _ => return Err(Self::unknown(field)),
        }
        Ok(())
    }

    fn normalize(&mut self) {
        if self.currently_working {
            self.end_date = None;
        }
    }

    fn is_blank(&self) -> bool {
        self.designation.is_empty()
            && self.organization.is_empty()
            && self.location.is_empty()
            && self.description.is_empty()
            && self.start_date.is_none()
    }
}

impl SectionEntry for ProjectEntry {
    const SECTION: Section = Section::AcademicProjects;
    const FIELDS: &'static [&'static str] = &[
        "title",
        "description",
        "start_date",
        "end_date",
        "currently_ongoing",
        "project_link",
    ];

    fn set_field(&mut self, field: &str, value: &Value) -> Result<(), SectionError> {
        match field {
            "title" => self.title = fields::text(value).map_err(invalid(field))?,
            "description" => self.description = fields::text(value).map_err(invalid(field))?,
            "start_date" => self.start_date = fields::date(value).map_err(invalid(field))?,
            "end_date" => self.end_date = fields::date(value).map_err(invalid(field))?,
            "currently_ongoing" => {
                self.currently_ongoing = fields::flag(value).map_err(invalid(field))?
            }
            "project_link" => self.project_link = fields::link(value).map_err(invalid(field))?,
            _ => return Err(Self::unknown(field)),
        }
        Ok(())
    }

    fn normalize(&mut self) {
        if self.currently_ongoing {
            self.end_date = None;
        }
    }

    fn is_blank(&self) -> bool {
        self.title.is_empty()
            && self.description.is_empty()
            && self.project_link.is_none()
            && self.start_date.is_none()
    }
}

impl SectionEntry for SkillEntry {
    const SECTION: Section = Section::Skills;
    const FIELDS: &'static [&'static str] = &["name"];

    fn set_field(&mut self, field: &str, value: &Value) -> Result<(), SectionError> {
        match field {
            "name" => self.name = fields::text(value).map_err(invalid(field))?,
            _ => return Err(Self::unknown(field)),
        }
        Ok(())
    }

    fn is_blank(&self) -> bool {
        self.name.is_empty()
    }
}

impl ProfileDetails {
    pub const FIELDS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "email",
        "phone_number",
        "college_name",
        "current_city",
    ];

    pub fn set_field(&mut self, field: &str, value: &Value) -> Result<(), SectionError> {
        let slot = match field {
            "first_name" => &mut self.first_name,
            "last_name" => &mut self.last_name,
            "email" => &mut self.email,
            "phone_number" => &mut self.phone_number,
            "college_name" => &mut self.college_name,
            "current_city" => &mut self.current_city,
            _ => {
                return Err(SectionError::UnknownField {
                    scope: "profile_details",
                    field: field.to_string(),
                })
            }
        };
        *slot = fields::text(value).map_err(invalid(field))?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generic editors over one collection
// ────────────────────────────────────────────────────────────────────────────

fn check_index<T: SectionEntry>(entries: &[T], index: usize) -> Result<(), SectionError> {
    if index < entries.len() {
        Ok(())
    } else {
        Err(SectionError::IndexOutOfRange {
            scope: T::SECTION.as_str(),
            index,
            len: entries.len(),
        })
    }
}

fn append_in<T: SectionEntry>(
    entries: &mut Vec<T>,
    template: &Map<String, Value>,
) -> Result<usize, SectionError> {
    let mut entry = T::default();
    for (field, value) in template {
        entry.set_field(field, value)?;
    }
    entry.normalize();
    entries.push(entry);
    Ok(entries.len() - 1)
}

fn update_in<T: SectionEntry>(
    entries: &mut [T],
    index: usize,
    field: &str,
    value: &Value,
) -> Result<(), SectionError> {
    check_index(entries, index)?;
    let entry = &mut entries[index];
    entry.set_field(field, value)?;
    entry.normalize();
    Ok(())
}

fn remove_in<T: SectionEntry>(entries: &mut Vec<T>, index: usize) -> Result<(), SectionError> {
    check_index(entries, index)?;
    entries.remove(index);
    Ok(())
}

/// Ordered snapshot of one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionEntries<'a> {
    Education(&'a [EducationEntry]),
    WorkExperiences(&'a [WorkExperienceEntry]),
    AcademicProjects(&'a [ProjectEntry]),
    Skills(&'a [SkillEntry]),
}

impl SectionEntries<'_> {
    pub fn len(&self) -> usize {
        match self {
            SectionEntries::Education(e) => e.len(),
            SectionEntries::WorkExperiences(e) => e.len(),
            SectionEntries::AcademicProjects(e) => e.len(),
            SectionEntries::Skills(e) => e.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProfileDocument {
    /// Appends an entry built from `template` (defaults for every field it omits).
    /// Returns the next document and the new entry's index.
    pub fn append_entry(
        &self,
        section: Section,
        template: &Map<String, Value>,
    ) -> Result<(ProfileDocument, usize), SectionError> {
        let mut next = self.clone();
        let index = match section {
            Section::Education => append_in(&mut next.education, template)?,
            Section::WorkExperiences => append_in(&mut next.work_experiences, template)?,
            Section::AcademicProjects => append_in(&mut next.academic_projects, template)?,
            Section::Skills => append_in(&mut next.skills, template)?,
        };
        Ok((next, index))
    }

    pub fn update_entry(
        &self,
        section: Section,
        index: usize,
        field: &str,
        value: &Value,
    ) -> Result<ProfileDocument, SectionError> {
        let mut next = self.clone();
        match section {
            Section::Education => update_in(&mut next.education, index, field, value)?,
            Section::WorkExperiences => {
                update_in(&mut next.work_experiences, index, field, value)?
            }
            Section::AcademicProjects => {
                update_in(&mut next.academic_projects, index, field, value)?
            }
            Section::Skills => update_in(&mut next.skills, index, field, value)?,
        }
        Ok(next)
    }

    /// Removes one entry; the remaining entries keep their relative order.
    pub fn remove_entry(
        &self,
        section: Section,
        index: usize,
    ) -> Result<ProfileDocument, SectionError> {
        let mut next = self.clone();
        match section {
            Section::Education => remove_in(&mut next.education, index)?,
            Section::WorkExperiences => remove_in(&mut next.work_experiences, index)?,
            Section::AcademicProjects => remove_in(&mut next.academic_projects, index)?,
            Section::Skills => remove_in(&mut next.skills, index)?,
        }
        Ok(next)
    }

    pub fn list_entries(&self, section: Section) -> SectionEntries<'_> {
        match section {
            Section::Education => SectionEntries::Education(&self.education),
            Section::WorkExperiences => SectionEntries::WorkExperiences(&self.work_experiences),
            Section::AcademicProjects => {
                SectionEntries::AcademicProjects(&self.academic_projects)
            }
            Section::Skills => SectionEntries::Skills(&self.skills),
        }
    }

    pub fn set_career_objective(&self, objective: &str) -> ProfileDocument {
        let objective = objective.trim();
        ProfileDocument {
            career_objective: (!objective.is_empty()).then(|| objective.to_string()),
            ..self.clone()
        }
    }

    pub fn update_detail(&self, field: &str, value: &Value) -> Result<ProfileDocument, SectionError> {
        let mut next = self.clone();
        next.profile_details.set_field(field, value)?;
        Ok(next)
    }
}
