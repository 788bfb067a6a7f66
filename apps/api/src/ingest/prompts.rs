// Resume ingestion LLM prompt templates.
// All prompts for the ingest module are defined here.

pub const RESUME_EXTRACTION_SYSTEM: &str = "\
You are a precise resume data extractor. \
Convert the text of a candidate's resume into one structured JSON object. \
Never guess: a value that is not in the resume is null, and a section that is not in the \
resume is omitted.";

/// Fixed schema description sent with every document. `{document_text}` is replaced
/// with the page-separated resume text.
pub const RESUME_EXTRACTION_PROMPT: &str = r#"Extract the candidate profile from the resume text below.

RESUME TEXT:
{document_text}

OUTPUT SCHEMA (return exactly this structure, omitting any section you cannot find):
{
  "career_objective": "string",
  "education": [
    {
      "institution": "string",
      "degree": "string",
      "stream": "string",
      "start_year": number | null,
      "end_year": number | null,
      "performance_type": "CGPA" | "Percentage" | "GPA",
      "performance_score": number | null
    }
  ],
  "work_experiences": [
    {
      "type": "Internship" | "Job" | "PartTime" | "Freelance",
      "designation": "string",
      "organization": "string",
      "location": "string",
      "location_type": "OnSite" | "Remote" | "Hybrid",
      "start_date": "YYYY-MM-DD" | null,
      "end_date": "YYYY-MM-DD" | null,
      "currently_working": true | false,
      "description": "string"
    }
  ],
  "academic_projects": [
    {
      "title": "string",
      "description": "string",
      "start_date": "YYYY-MM-DD" | null,
      "end_date": "YYYY-MM-DD" | null,
      "currently_ongoing": true | false,
      "project_link": "string" | null
    }
  ],
  "skills": [
    { "name": "string" }
  ],
  "profile_details": {
    "first_name": "string",
    "last_name": "string",
    "email": "string",
    "phone_number": "string",
    "college_name": "string",
    "current_city": "string"
  }
}

RULES:
1. Dates must be "YYYY-MM-DD". Use "YYYY-MM-01" if only the month is known, "YYYY-01-01" if only the year.
2. If a role or project is ongoing ("Present", "Current"), set currently_working / currently_ongoing to true and end_date to null.
3. One skill per entry in "skills"; do not group skills into categories.
4. Keep descriptions in the candidate's own words.
5. Return ONLY the JSON object, nothing else, no code fences."#;
