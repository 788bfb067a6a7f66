// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction against inventing data the source text does not contain.
pub const NO_INFERENCE_INSTRUCTION: &str = "\
    CRITICAL: Extract only what the document states. Do NOT infer, interpolate, or invent \
    details. If a value is not present, use null (or omit the section entirely).";
