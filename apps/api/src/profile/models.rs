use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::profile::fields::Choice;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceType {
    #[default]
    #[serde(rename = "CGPA")]
    Cgpa,
    Percentage,
    #[serde(rename = "GPA")]
    Gpa,
}

impl Choice for PerformanceType {
    const EXPECTED: &'static str = "one of CGPA, Percentage, GPA";
    const NAMES: &'static [(&'static str, Self)] = &[
        ("CGPA", Self::Cgpa),
        ("Percentage", Self::Percentage),
        ("GPA", Self::Gpa),
        ("Percent", Self::Percentage),
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkType {
    #[default]
    Internship,
    Job,
    PartTime,
    Freelance,
}

impl Choice for WorkType {
    const EXPECTED: &'static str = "one of Internship, Job, PartTime, Freelance";
    const NAMES: &'static [(&'static str, Self)] = &[
        ("Internship", Self::Internship),
        ("Job", Self::Job),
        ("PartTime", Self::PartTime),
        ("Freelance", Self::Freelance),
        ("Intern", Self::Internship),
        ("FullTime", Self::Job),
        ("Freelancer", Self::Freelance),
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationType {
    #[default]
    OnSite,
    Remote,
    Hybrid,
}

impl Choice for LocationType {
    const EXPECTED: &'static str = "one of OnSite, Remote, Hybrid";
    const NAMES: &'static [(&'static str, Self)] = &[
        ("OnSite", Self::OnSite),
        ("Remote", Self::Remote),
        ("Hybrid", Self::Hybrid),
        ("WorkFromHome", Self::Remote),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub stream: String,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub performance_type: PerformanceType,
    pub performance_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperienceEntry {
    #[serde(rename = "type")]
    pub work_type: WorkType,
    pub designation: String,
    pub organization: String,
    pub location: String,
    pub location_type: LocationType,
    pub start_date: Option<NaiveDate>,
    /// Always `None` while `currently_working` is set.
    pub end_date: Option<NaiveDate>,
    pub currently_working: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    /// Always `None` while `currently_ongoing` is set.
    pub end_date: Option<NaiveDate>,
    pub currently_ongoing: bool,
    pub project_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillEntry {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub college_name: String,
    pub current_city: String,
}

/// The structured resume record for one candidate.
///
/// Persisted whole; every edit produces a new value rather than patching fields in storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDocument {
    pub career_objective: Option<String>,
    pub education: Vec<EducationEntry>,
    pub work_experiences: Vec<WorkExperienceEntry>,
    pub academic_projects: Vec<ProjectEntry>,
    pub skills: Vec<SkillEntry>,
    pub profile_details: ProfileDetails,
}

/// Profile detail fields recovered from a resume. `None` means "not found", never "clear it".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDetailsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_city: Option<String>,
}

impl ProfileDetailsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlays the recovered fields onto `details`, keeping everything else.
    pub fn apply_to(&self, details: &ProfileDetails) -> ProfileDetails {
        let pick = |patch: &Option<String>, current: &String| {
            patch.clone().unwrap_or_else(|| current.clone())
        };
        ProfileDetails {
            first_name: pick(&self.first_name, &details.first_name),
            last_name: pick(&self.last_name, &details.last_name),
            email: pick(&self.email, &details.email),
            phone_number: pick(&self.phone_number, &details.phone_number),
            college_name: pick(&self.college_name, &details.college_name),
            current_city: pick(&self.current_city, &details.current_city),
        }
    }
}

/// Sections recovered from one extraction. A `None` section was not recovered and
/// must leave the working document untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialProfileDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career_objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_experiences: Option<Vec<WorkExperienceEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_projects: Option<Vec<ProjectEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<SkillEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_details: Option<ProfileDetailsPatch>,
}

impl PartialProfileDocument {
    /// Names of the sections present, in canonical schema order.
    pub fn present_sections(&self) -> Vec<&'static str> {
        [
            ("career_objective", self.career_objective.is_some()),
            ("education", self.education.is_some()),
            ("work_experiences", self.work_experiences.is_some()),
            ("academic_projects", self.academic_projects.is_some()),
            ("skills", self.skills.is_some()),
            ("profile_details", self.profile_details.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present_sections().is_empty()
    }
}
