//! Extraction reply parser.
//!
//! Two phases:
//! 1. `locate_json_object` is tolerant: slices from the first `{` to the last `}` so prose
//!    around the object ("Here is the data: {...} Hope this helps!") is ignored.
//! 2. `parse_extraction_output` is strict about structure (the slice must decode as a JSON
//!    object, no repair is attempted), permissive about content: unknown keys, non-list
//!    sections, malformed entries and malformed fields are dropped or defaulted locally.

use std::collections::HashSet;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::ingest::IngestError;
use crate::profile::fields;
use crate::profile::models::{
    EducationEntry, PartialProfileDocument, ProfileDetailsPatch, SkillEntry,
};
use crate::profile::sections::SectionEntry;

/// Returns the text between the first `{` and the last `}`, inclusive.
pub fn locate_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

pub fn parse_extraction_output(raw: &str) -> Result<PartialProfileDocument, IngestError> {
    let candidate = locate_json_object(raw).ok_or_else(|| {
        IngestError::MalformedExtractionOutput("reply contains no JSON object".to_string())
    })?;

    let value: Value = serde_json::from_str(candidate).map_err(|e| {
        IngestError::MalformedExtractionOutput(format!("reply is not valid JSON: {e}"))
    })?;

    match value {
        Value::Object(root) => Ok(normalize_document(&root)),
        _ => Err(IngestError::MalformedExtractionOutput(
            "reply JSON is not an object".to_string(),
        )),
    }
}

fn normalize_document(root: &Map<String, Value>) -> PartialProfileDocument {
    let mut partial = PartialProfileDocument::default();

    for (key, value) in root {
        match key.as_str() {
            "career_objective" => {
                partial.career_objective = fields::optional_text(value).ok().flatten();
            }
            "education" => {
                partial.education = normalize_list::<EducationEntry>(value)
                    .map(|entries| entries.into_iter().map(repair_year_order).collect());
            }
            "work_experiences" => partial.work_experiences = normalize_list(value),
            "academic_projects" => partial.academic_projects = normalize_list(value),
            "skills" => {
                partial.skills = normalize_list(&lift_bare_skills(value)).map(dedup_skills);
            }
            "profile_details" => partial.profile_details = normalize_details(value),
            other => debug!("Dropping unknown top-level key '{other}'"),
        }
    }

    partial
}

/// Normalizes one repeatable section. `None` means "leave the section untouched":
/// the value was not a list, or no entry in it survived.
fn normalize_list<T: SectionEntry>(value: &Value) -> Option<Vec<T>> {
    let section = T::SECTION.as_str();
    let Value::Array(items) = value else {
        if !value.is_null() {
            warn!("Section '{section}' is not a list; dropping it");
        }
        return None;
    };

    let entries: Vec<T> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| normalize_entry(index, item))
        .collect();

    if entries.is_empty() {
        debug!("Section '{section}' has no usable entries; leaving it untouched");
        return None;
    }
    if entries.len() < items.len() {
        warn!(
            "Section '{section}': kept {} of {} entries",
            entries.len(),
            items.len()
        );
    }
    Some(entries)
}

fn normalize_entry<T: SectionEntry>(index: usize, item: &Value) -> Option<T> {
    let section = T::SECTION.as_str();
    let Value::Object(map) = item else {
        warn!("{section}[{index}] is not an object; dropping it");
        return None;
    };

    let mut entry = T::default();
    for &field in T::FIELDS {
        if let Some(value) = map.get(field) {
            if let Err(e) = entry.set_field(field, value) {
                debug!("{section}[{index}].{field} reset to default: {e}");
            }
        }
    }
    entry.normalize();

    if entry.is_blank() {
        debug!("{section}[{index}] is blank; dropping it");
        return None;
    }
    Some(entry)
}

fn repair_year_order(mut entry: EducationEntry) -> EducationEntry {
    if let (Some(start), Some(end)) = (entry.start_year, entry.end_year) {
        if end < start {
            debug!("Education end_year {end} precedes start_year {start}; clearing end_year");
            entry.end_year = None;
        }
    }
    entry
}

/// Accepts `"skills": ["Rust", {"name": "SQL"}]` as well as the canonical object form.
fn lift_bare_skills(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| match item {
                    Value::String(name) => json!({ "name": name }),
                    other => other.clone(),
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Case-insensitive de-duplication; the first spelling wins.
fn dedup_skills(skills: Vec<SkillEntry>) -> Vec<SkillEntry> {
    let mut seen = HashSet::new();
    skills
        .into_iter()
        .filter(|skill| seen.insert(skill.name.to_lowercase()))
        .collect()
}

fn normalize_details(value: &Value) -> Option<ProfileDetailsPatch> {
    let Value::Object(map) = value else {
        if !value.is_null() {
            warn!("Section 'profile_details' is not an object; dropping it");
        }
        return None;
    };

    let pick = |field: &str| {
        map.get(field)
            .and_then(|v| fields::optional_text(v).ok().flatten())
    };
    let patch = ProfileDetailsPatch {
        first_name: pick("first_name"),
        last_name: pick("last_name"),
        email: pick("email"),
        phone_number: pick("phone_number"),
        college_name: pick("college_name"),
        current_city: pick("current_city"),
    };

    (!patch.is_empty()).then_some(patch)
}
