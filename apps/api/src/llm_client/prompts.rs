// Shared prompt text for the chat-completion client.
// Field-specific prompts live in autofill::prompts.

/// System prompt sent with every application question.
pub const SYSTEM_PROMPT: &str = "You are a professional job applicant. \
    Provide concise, relevant answers to job application questions. \
    Keep responses professional and under 200 words.";

/// Returned when no API key is configured.
pub const GENERIC_ANSWER: &str =
    "I am a professional candidate with relevant experience for this position.";

/// Returned when the call fails and no fallback keyword matches.
pub const DEFAULT_FALLBACK_ANSWER: &str =
    "I am a qualified candidate with relevant experience and am excited about this opportunity.";

/// Canned answers for failed calls, checked in order against the lowercased question.
const FALLBACK_ANSWERS: &[(&str, &str)] = &[
    (
        "salary",
        "I am open to discussing salary based on the role requirements and market standards.",
    ),
    (
        "experience",
        "I have relevant experience in this field and am excited about this opportunity.",
    ),
    (
        "why",
        "I am passionate about this role and believe my skills align well with your requirements.",
    ),
    (
        "strengths",
        "I am detail-oriented, collaborative, and have strong problem-solving skills.",
    ),
    (
        "weaknesses",
        "I continuously work on improving my skills and learning new technologies.",
    ),
    (
        "goals",
        "I aim to grow professionally while contributing to the company's success.",
    ),
    (
        "teamwork",
        "I enjoy collaborating with diverse teams and believe in open communication.",
    ),
    (
        "leadership",
        "I have experience leading projects and mentoring team members.",
    ),
    (
        "challenge",
        "I enjoy tackling complex problems and finding innovative solutions.",
    ),
    (
        "learning",
        "I am committed to continuous learning and staying updated with industry trends.",
    ),
];

/// Wraps a question (and optional context) into the user prompt.
pub fn build_prompt(question: &str, context: &str) -> String {
    let mut prompt = format!("Question: {question}\n\n");

    if !context.is_empty() {
        prompt.push_str(&format!("Context: {context}\n\n"));
    }

    prompt.push_str("Please provide a professional and relevant answer to this job application question. ");
    prompt.push_str("Focus on demonstrating relevant skills, experience, and enthusiasm for the role. ");
    prompt.push_str("Keep the response concise and authentic.");
    prompt
}

/// Static answer used when the LLM call fails.
pub fn fallback_answer(question: &str) -> &'static str {
    let question = question.to_lowercase();
    FALLBACK_ANSWERS
        .iter()
        .find(|(keyword, _)| question.contains(keyword))
        .map(|(_, answer)| *answer)
        .unwrap_or(DEFAULT_FALLBACK_ANSWER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_context() {
        let prompt = build_prompt("Why this role?", "");
        assert!(prompt.starts_with("Question: Why this role?\n\n"));
        assert!(!prompt.contains("Context:"));
        assert!(prompt.ends_with("Keep the response concise and authentic."));
    }

    #[test]
    fn test_prompt_with_context() {
        let prompt = build_prompt("Sponsorship?", "Options: Yes, No");
        assert!(prompt.contains("Context: Options: Yes, No\n\n"));
    }

    #[test]
    fn test_fallback_matches_first_keyword_in_table_order() {
        // "salary" precedes "experience" in the table.
        assert!(fallback_answer("Salary expectations given your experience?")
            .contains("discussing salary"));
        assert!(fallback_answer("Describe your LEADERSHIP style").contains("leading projects"));
    }

    #[test]
    fn test_fallback_default() {
        assert_eq!(fallback_answer("Favourite colour?"), DEFAULT_FALLBACK_ANSWER);
    }
}
