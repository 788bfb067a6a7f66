// Candidate profile: the document model, field coercion, section editors, validation,
// completeness scoring, and the edit session that moves a document between draft and
// persisted storage.

pub mod completeness;
pub mod drafts;
pub mod fields;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod sections;
pub mod session;
pub mod validation;
