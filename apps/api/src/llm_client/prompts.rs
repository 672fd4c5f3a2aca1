// Shared prompt constants and prompt-building utilities.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps interpretations grounded in the computed chart and away from fatalism.
pub const GROUNDING_INSTRUCTION: &str = "\
    只依据下方给出的排盘数据进行解读，不要自行推算或编造盘面中没有的星曜、干支或卦象。\
    语气积极克制，避免绝对化、宿命化的断语，不涉及医疗、法律与投资的具体建议。";
