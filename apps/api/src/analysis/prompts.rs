// Prompt templates for résumé analysis.
// Placeholders are substituted with `str::replace` before sending.

/// Critique prompt. Replace `{json_only}` and `{resume_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"
You are a professional ATS resume evaluator.

Analyze the resume below and return your analysis as valid JSON with these exact keys:
- "strengths": array of strings listing resume strengths
- "weaknesses": array of strings listing resume weaknesses
- "missing_keywords": array of strings listing important missing keywords
- "suggestions": array of strings with improvement suggestions
- "hr_questions": array of 5 tailored interview questions for this candidate
- "tips": array of actionable do's and don'ts

{json_only}

Resume:
{resume_text}
"#;

/// Interview question prompt. Replace `{resume_text}` before sending.
/// The response format is line-oriented and parsed by `analysis::interview`.
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"
You are an expert interviewer. Read this resume and generate 10 unique interview questions
(mix of technical and behavioral) with brief expected answers. Format as:
1. Question: ...
   Expected Answer: ...
Resume:
{resume_text}
"#;

pub fn build_analysis_prompt(resume_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{json_only}", crate::llm_client::prompts::JSON_ONLY_INSTRUCTION)
        .replace("{resume_text}", resume_text)
}

pub fn build_interview_prompt(resume_text: &str) -> String {
    INTERVIEW_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}
