use crate::profile::models::{PartialProfileDocument, ProfileDocument};

/// Merges freshly extracted sections into the working document.
///
/// Each repeatable section present in `partial` replaces the working section as a whole;
/// entries are never matched one-to-one against hand-edited ones. Profile details are
/// overlaid field by field. Anything absent from `partial` is carried over unchanged.
///
/// Pure and idempotent: `reconcile(&reconcile(d, p), p) == reconcile(d, p)`.
pub fn reconcile(doc: &ProfileDocument, partial: &PartialProfileDocument) -> ProfileDocument {
    let mut next = doc.clone();

    if let Some(objective) = &partial.career_objective {
        next.career_objective = Some(objective.clone());
    }
    if let Some(education) = &partial.education {
        next.education = education.clone();
    }
    if let Some(work) = &partial.work_experiences {
        next.work_experiences = work.clone();
    }
    if let Some(projects) = &partial.academic_projects {
        next.academic_projects = projects.clone();
    }
    if let Some(skills) = &partial.skills {
        next.skills = skills.clone();
    }
    if let Some(details) = &partial.profile_details {
        next.profile_details = details.apply_to(&doc.profile_details);
    }

    next
}
