// Prompt template for section content generation.
// The system persona is shared: see llm_client::prompts.

/// Per-section user prompt. Replace `{transcript}` and `{instruction}` before sending.
pub const SECTION_PROMPT_TEMPLATE: &str = r#"You are a Senior Business Analyst.
TRANSCRIPT CONTEXT:
{transcript}

QUESTION TO ANSWER:
{instruction}

INSTRUCTIONS:
- Provide a comprehensive, detailed narrative answer.
- Base your answer strictly on the transcript provided."#;

/// Fills the section prompt template in a single pass over the template, so
/// placeholder text inside either value is copied literally.
pub fn build_section_prompt(transcript: &str, instruction: &str) -> String {
    let mut out = String::with_capacity(SECTION_PROMPT_TEMPLATE.len() + transcript.len() + instruction.len());
    let mut rest = SECTION_PROMPT_TEMPLATE;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        if let Some(after) = tail.strip_prefix("{transcript}") {
            out.push_str(transcript);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{instruction}") {
            out.push_str(instruction.trim());
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}
