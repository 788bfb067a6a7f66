use serde::{Deserialize, Serialize};

use crate::profile::models::ProfileDocument;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Strong,
    Moderate,
    Weak,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHealth {
    pub section: String,
    pub score: f64,
    pub entry_count: usize,
    pub status: SectionStatus,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub overall_score: f64,
    pub sections: Vec<SectionHealth>,
    pub missing_sections: Vec<String>,
}

const SECTION_WEIGHTS: &[(&str, f64)] = &[
    ("profile_details", 0.20),
    ("education", 0.25),
    ("skills", 0.20),
    ("work_experiences", 0.15),
    ("academic_projects", 0.15),
    ("career_objective", 0.05),
];

/// Fraction of `filled` over `total`, 0.0 for an empty denominator.
fn ratio(filled: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        filled as f64 / total as f64
    }
}

/// Scores one section in 0..1 and counts its entries.
fn score_section(doc: &ProfileDocument, section: &str) -> (f64, usize) {
    match section {
        "profile_details" => {
            let d = &doc.profile_details;
            let fields = [
                &d.first_name,
                &d.last_name,
                &d.email,
                &d.phone_number,
                &d.college_name,
                &d.current_city,
            ];
            let filled = fields.iter().filter(|f| !f.trim().is_empty()).count();
            (ratio(filled, fields.len()), usize::from(filled > 0))
        }
        "career_objective" => {
            let present = doc
                .career_objective
                .as_deref()
                .is_some_and(|o| !o.trim().is_empty());
            (if present { 1.0 } else { 0.0 }, usize::from(present))
        }
        "education" => {
            let n = doc.education.len();
            let complete = doc
                .education
                .iter()
                .filter(|e| !e.institution.is_empty() && !e.degree.is_empty() && e.end_year.is_some())
                .count();
            (ratio(complete, n), n)
        }
        "work_experiences" => {
            let n = doc.work_experiences.len();
            let complete = doc
                .work_experiences
                .iter()
                .filter(|w| !w.designation.is_empty() && !w.description.is_empty())
                .count();
            (ratio(complete, n), n)
        }
        "academic_projects" => {
            let n = doc.academic_projects.len();
            let complete = doc
                .academic_projects
                .iter()
                .filter(|p| !p.title.is_empty() && !p.description.is_empty())
                .count();
            (ratio(complete, n), n)
        }
        "skills" => {
            let n = doc.skills.len();
            // Five or more named skills is a full section.
            (ratio(n.min(5), 5), n)
        }
        _ => (0.0, 0),
    }
}

pub fn compute_completeness_report(doc: &ProfileDocument) -> CompletenessReport {
    let mut sections = Vec::new();
    let mut weighted_score_sum = 0.0;
    let mut missing_sections = Vec::new();

    for (section_key, weight) in SECTION_WEIGHTS {
        let (score, entry_count) = score_section(doc, section_key);

        if entry_count == 0 {
            missing_sections.push(section_key.to_string());
            sections.push(SectionHealth {
                section: section_key.to_string(),
                score: 0.0,
                entry_count: 0,
                status: SectionStatus::Missing,
                recommendations: vec![format!(
                    "Add your {} to complete your profile",
                    section_key.replace('_', " ")
                )],
            });
            continue;
        }

        let score = score.clamp(0.0, 1.0);
        let status = match score {
            s if s >= 0.8 => SectionStatus::Strong,
            s if s >= 0.5 => SectionStatus::Moderate,
            _ => SectionStatus::Weak,
        };

        let mut recommendations = Vec::new();
        if status != SectionStatus::Strong {
            recommendations.push(format!(
                "Some {} entries are missing details; fill in the empty fields",
                section_key.replace('_', " ")
            ));
        }

        weighted_score_sum += score * weight;
        sections.push(SectionHealth {
            section: section_key.to_string(),
            score,
            entry_count,
            status,
            recommendations,
        });
    }

    let total_weight: f64 = SECTION_WEIGHTS.iter().map(|(_, w)| w).sum();
    let overall_score = if total_weight > 0.0 {
        (weighted_score_sum / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    CompletenessReport {
        overall_score,
        sections,
        missing_sections,
    }
}
