use crate::models::Profile;
use crate::page::FormControl;

#[derive(Debug, Clone, Copy)]
enum ProfileSource {
    Key(&'static str),
    /// `fullName`, else first and last name joined.
    DisplayName,
}

/// Field keyword to profile value, checked in this order.
const FIELD_KEYWORDS: &[(&str, ProfileSource)] = &[
    ("first", ProfileSource::Key("firstName")),
    ("last", ProfileSource::Key("lastName")),
    ("name", ProfileSource::DisplayName),
    ("email", ProfileSource::Key("email")),
    ("phone", ProfileSource::Key("phone")),
    ("mobile", ProfileSource::Key("phone")),
    ("address", ProfileSource::Key("address")),
    ("city", ProfileSource::Key("city")),
    ("state", ProfileSource::Key("state")),
    ("zip", ProfileSource::Key("zipCode")),
    ("postal", ProfileSource::Key("zipCode")),
    ("country", ProfileSource::Key("country")),
    ("linkedin", ProfileSource::Key("linkedin")),
    ("github", ProfileSource::Key("github")),
    ("website", ProfileSource::Key("website")),
    ("company", ProfileSource::Key("currentCompany")),
    ("employer", ProfileSource::Key("currentCompany")),
    ("title", ProfileSource::Key("currentTitle")),
    ("position", ProfileSource::Key("currentTitle")),
    ("experience", ProfileSource::Key("experience")),
    ("education", ProfileSource::Key("education")),
    ("degree", ProfileSource::Key("education")),
    ("salary", ProfileSource::Key("salary")),
    ("availability", ProfileSource::Key("availability")),
];

fn resolve(profile: &Profile, source: ProfileSource) -> Option<String> {
    match source {
        ProfileSource::Key(key) => profile.get(key).map(str::to_string),
        ProfileSource::DisplayName => profile.display_name(),
    }
}

/// Profile value for a control, matched on its name and id first, then on its question text.
pub fn profile_value_for_field(profile: &Profile, control: &FormControl) -> Option<String> {
    let name = control.name.as_deref().unwrap_or_default().to_lowercase();
    let id = control.id.as_deref().unwrap_or_default().to_lowercase();
    let question = control.question().to_lowercase();

    let lookup = |matches: &dyn Fn(&str) -> bool| {
        FIELD_KEYWORDS
            .iter()
            .filter(|(keyword, _)| matches(*keyword))
            .find_map(|(_, source)| resolve(profile, *source))
    };

    lookup(&|k: &str| name.contains(k) || id.contains(k))
        .or_else(|| lookup(&|k: &str| question.contains(k)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::FormDocument;

    fn profile() -> Profile {
        [
            ("firstName", "Ada"),
            ("lastName", "Lovelace"),
            ("phone", "555-0100"),
            ("zipCode", "10001"),
            ("currentTitle", "Engineer"),
        ]
        .into_iter()
        .collect()
    }

    fn control(html: &str) -> FormControl {
        FormDocument::parse("https://x.test", html).controls.remove(0)
    }

    #[test]
    fn test_matches_on_name() {
        let c = control(r#"<input name="mobile_number">"#);
        assert_eq!(profile_value_for_field(&profile(), &c).as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_name_builds_display_name() {
        let c = control(r#"<input id="candidate-name">"#);
        assert_eq!(
            profile_value_for_field(&profile(), &c).as_deref(),
            Some("Ada Lovelace")
        );
    }

    #[test]
    fn test_name_and_id_beat_question_text() {
        let c = control(r#"<label>Job title<input name="postal"></label>"#);
        assert_eq!(profile_value_for_field(&profile(), &c).as_deref(), Some("10001"));
    }

    #[test]
    fn test_falls_back_to_question_text() {
        let c = control(r#"<label>Current position<input name="q_17"></label>"#);
        assert_eq!(profile_value_for_field(&profile(), &c).as_deref(), Some("Engineer"));
    }

    #[test]
    fn test_keys_without_values_are_skipped() {
        // "email" has no profile value; the question text then matches nothing.
        let c = control(r#"<input name="email" placeholder="you@example.com">"#);
        assert_eq!(profile_value_for_field(&profile(), &c), None);
    }
}
