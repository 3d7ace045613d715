// Prompts for questions the static tables and the profile could not answer.
// The generic question wrapper and system prompt live in llm_client::prompts.

use crate::models::Profile;
use crate::page::document::{FieldKind, FormControl, FormDocument};

/// Select/radio prompt. Replace `{question}` and `{options}` before sending.
pub const OPTION_CHOICE_TEMPLATE: &str = "You are filling out a job application. Here is the question: \"{question}\".\n\
Available options: {options}\n\
Choose the best option from the list. Only respond with the exact option text.";

/// Checkbox prompt. Replace `{question}` before sending.
pub const CHECKBOX_TEMPLATE: &str = "You are filling out a job application. Here is the question: \"{question}\".\n\
Should this box be checked? Answer only \"Yes\" or \"No\".";

const INTERNATIONAL_STUDENT_NOTE: &str = "IMPORTANT: You are an international student. \
International students typically DO NOT require visa sponsorship for internships and some \
entry-level positions. Only select \"Yes\" for sponsorship if the question specifically asks \
about H1B sponsorship for full-time positions.";

/// Free-text prompt. Replace `{question}`, `{field_type}`, `{field_name}`, `{options}` and
/// `{profile_context}` before sending.
pub const FIELD_PROMPT_TEMPLATE: &str = r#"You are filling out a job application form. Please provide a concise, professional answer for the following question.

Question: "{question}"
Field Type: {field_type}
Field Name: {field_name}{options}

Your Profile Information:{profile_context}

Instructions:
- Provide a short, direct answer (1-2 sentences max for text fields)
- For select/radio fields: Choose the BEST matching option from the available choices
- For checkbox fields: Answer "Yes" or "No" based on the question
- Be professional and positive
- For sponsorship questions: International students typically don't need sponsorship for internships
- For demographic questions: Use "Prefer not to say" if uncomfortable
- For salary questions: Use "Negotiable" or "Market rate" if unsure
- If no good option exists, choose the closest match or "Other" if available

Answer:"#;

/// Fills `{key}` placeholders in one pass, so substituted page text is never rescanned.
/// Unknown placeholders are kept as written.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn option_choice_prompt(question: &str, options: &[String]) -> String {
    fill_template(
        OPTION_CHOICE_TEMPLATE,
        &[("question", question), ("options", options.join(", ").as_str())],
    )
}

pub fn checkbox_prompt(question: &str) -> String {
    fill_template(CHECKBOX_TEMPLATE, &[("question", question)])
}

/// Visa and work-authorization lines from the profile, each prefixed with a newline.
fn profile_context(profile: &Profile) -> String {
    let mut context = String::new();
    for (key, label) in [
        ("visaStatus", "Visa Status"),
        ("sponsorship", "Sponsorship"),
        ("workAuthorization", "Work Authorization"),
    ] {
        if let Some(value) = profile.get(key) {
            context.push_str(&format!("\n{label}: {value}"));
        }
    }
    if matches!(profile.get("visaStatus"), Some("student" | "visa")) {
        context.push('\n');
        context.push_str(INTERNATIONAL_STUDENT_NOTE);
    }
    context
}

/// `text (value)` pairs for a select or radio group.
fn field_options(doc: &FormDocument, control: &FormControl) -> String {
    let pairs: Vec<String> = match control.kind() {
        FieldKind::Select => control
            .options
            .iter()
            .map(|o| format!("{} ({})", o.text, o.value))
            .collect(),
        FieldKind::Radio => doc
            .radio_choices(control)
            .iter()
            .map(|r| format!("{} ({})", r.choice_label(), r.value))
            .collect(),
        _ => return String::new(),
    };
    format!("\nAvailable Options: {}", pairs.join(", "))
}

/// Context-aware prompt for a free-text field.
pub fn field_prompt(
    question: &str,
    doc: &FormDocument,
    control: &FormControl,
    profile: &Profile,
) -> String {
    fill_template(
        FIELD_PROMPT_TEMPLATE,
        &[
            ("question", question),
            ("field_type", control.kind().as_str()),
            ("field_name", control.name.as_deref().unwrap_or_default()),
            ("options", field_options(doc, control).as_str()),
            ("profile_context", profile_context(profile).as_str()),
        ],
    )
}
