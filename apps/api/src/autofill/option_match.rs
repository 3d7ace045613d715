//! Mapping free-text answers onto the choices a control actually offers.

use crate::page::document::{FormControl, SelectOption};

/// Picks the option that best matches `answer`.
///
/// Tiers, first hit wins: exact (case-insensitive), substring in either direction, any
/// word of the answer contained in the option, then the first option. Blank options never
/// win the substring or word tiers.
pub fn fuzzy_match_option<'a>(options: &'a [String], answer: &str) -> Option<&'a str> {
    let answer = answer.trim().to_lowercase();
    if answer.is_empty() {
        return None;
    }
    let lowered: Vec<String> = options.iter().map(|o| o.to_lowercase()).collect();
    let pick = |i: usize| options[i].as_str();

    if let Some(i) = lowered.iter().position(|o| *o == answer) {
        return Some(pick(i));
    }

    if let Some(i) = lowered
        .iter()
        .position(|o| !o.trim().is_empty() && (answer.contains(o.as_str()) || o.contains(&answer)))
    {
        return Some(pick(i));
    }

    let words: Vec<&str> = answer.split_whitespace().collect();
    if let Some(i) = lowered
        .iter()
        .position(|o| !o.trim().is_empty() && words.iter().any(|w| o.contains(w)))
    {
        return Some(pick(i));
    }

    options
        .first()
        .map(String::as_str)
        .filter(|o| !o.trim().is_empty())
}

/// Band → keywords, per select context.
type Mapping = (&'static str, &'static [&'static str]);

const FIELD_MAPPINGS: &[(&str, &[Mapping])] = &[
    (
        "experience",
        &[
            ("0-1", &["0", "1", "entry", "junior", "0-1", "less than 1"]),
            ("1-3", &["1-3", "1 to 3", "junior", "1 year", "2 years", "3 years"]),
            (
                "3-5",
                &["3-5", "3 to 5", "mid", "senior", "3 years", "4 years", "5 years"],
            ),
            (
                "5+",
                &[
                    "5+", "5+ years", "senior", "expert", "advanced", "5 years", "6 years",
                    "7 years", "8 years", "9 years", "10 years",
                ],
            ),
        ],
    ),
    (
        "education",
        &[
            ("high school", &["high school", "secondary", "hs", "12th grade"]),
            (
                "bachelor",
                &["bachelor", "bachelors", "bs", "ba", "undergraduate", "college"],
            ),
            (
                "master",
                &["master", "masters", "ms", "ma", "graduate", "postgraduate"],
            ),
            ("phd", &["phd", "doctorate", "doctoral", "doctor"]),
        ],
    ),
    (
        "sponsorship",
        &[
            ("yes", &["yes", "require", "need", "sponsorship", "h1b", "visa"]),
            (
                "no",
                &[
                    "no", "not require", "dont need", "no sponsorship", "authorized",
                    "citizen", "permanent",
                ],
            ),
        ],
    ),
    (
        "visa",
        &[
            ("student", &["student", "f1", "opt", "cpt"]),
            ("h1b", &["h1b", "work visa", "sponsored"]),
            ("green card", &["green card", "permanent", "resident"]),
            ("citizen", &["citizen", "us citizen", "american"]),
        ],
    ),
];

fn option_contains(option: &SelectOption, needle: &str) -> bool {
    option.value.to_lowercase().contains(needle) || option.text.to_lowercase().contains(needle)
}

/// Option of a select for `value`: exact value or text, then partial, then the
/// context mappings keyed on the select's name or id.
pub fn resolve_select_option<'a>(select: &'a FormControl, value: &str) -> Option<&'a SelectOption> {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return None;
    }

    select
        .options
        .iter()
        .find(|o| o.value.to_lowercase() == value || o.text.to_lowercase() == value)
        .or_else(|| select.options.iter().find(|o| option_contains(o, &value)))
        .or_else(|| mapped_option(select, &value))
}

fn mapped_option<'a>(select: &'a FormControl, value: &str) -> Option<&'a SelectOption> {
    let name = select.name.as_deref().unwrap_or_default().to_lowercase();
    let id = select.id.as_deref().unwrap_or_default().to_lowercase();

    FIELD_MAPPINGS
        .iter()
        .filter(|(context, _)| name.contains(context) || id.contains(context))
        .flat_map(|(_, mappings)| mappings.iter())
        .filter(|(_, keywords)| keywords.iter().any(|k| value.contains(k)))
        .find_map(|(band, _)| select.options.iter().find(|o| option_contains(o, band)))
}

/// First radio whose value or label equals `value`, else the first that contains it.
pub fn resolve_radio<'a>(choices: &[&'a FormControl], value: &str) -> Option<&'a FormControl> {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return None;
    }
    choices
        .iter()
        .copied()
        .find(|radio| {
            let (radio_value, label) = radio_keys(radio);
            radio_value == value || label == value
        })
        .or_else(|| {
            choices.iter().copied().find(|radio| {
                let (radio_value, label) = radio_keys(radio);
                radio_value.contains(&value) || label.contains(&value)
            })
        })
}

fn radio_keys(radio: &FormControl) -> (String, String) {
    (
        radio.value.trim().to_lowercase(),
        radio.label.as_deref().unwrap_or_default().trim().to_lowercase(),
    )
}

const AFFIRMATIVE: &[&str] = &["yes", "true", "1", "check", "agree", "accept"];

/// Whether a checkbox should end up checked for `value`.
pub fn checkbox_should_check(checkbox: &FormControl, value: &str) -> bool {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return false;
    }
    let label = checkbox.label.as_deref().unwrap_or_default().to_lowercase();
    AFFIRMATIVE.contains(&value.as_str())
        || checkbox.value.to_lowercase().contains(&value)
        || label.contains(&value)
}
