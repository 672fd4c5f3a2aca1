// All LLM prompt constants for the analysis pipeline.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Persona for the interpretation call. JSON-only rules are appended at call time.
pub const INTERPRET_ROLE: &str = "你是一位精通八字命理、紫微斗数与周易的资深命理顾问，\
    擅长把专业排盘转化为温和、具体、可执行的中文建议。";

/// Interpretation prompt template.
/// Replace: {grounding_instruction}, {bazi_json}, {ziwei_json}, {zhouyi_json}, {question}
pub const INTERPRET_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

请根据以下三部分排盘结果，分别撰写中文解读。

【八字排盘】
{bazi_json}

【紫微斗数排盘】
{ziwei_json}

【周易卜卦】
{zhouyi_json}
求测事项：{question}

Return a JSON object with this EXACT schema (no extra fields):
{
  "bazi": "八字分析：命局格局、五行强弱、喜用神与生活建议",
  "ziwei": "紫微斗数解读：命宫主星、身宫、四化与大限走势",
  "zhouyi": "卦象解读：本卦、动爻与变卦的含义，以及对求测事项的启示"
}

HARD RULES:
1. Every field is plain text in Simplified Chinese, 200 to 400 characters, no markdown
2. Separate paragraphs inside a field with "\n"
3. Use ONLY the chart data above; never recompute pillars, stars or hexagrams"#;

/// Placeholder when the user asked no specific question.
pub const NO_QUESTION: &str = "未指定，请就近期整体运势作答";
