//! Static answer tables consulted before the profile and the LLM.

struct KeywordAnswer {
    keywords: &'static [&'static str],
    answer: &'static str,
}

/// First entry with a keyword contained in the lowercased question wins.
const HARDCODED_ANSWERS: &[KeywordAnswer] = &[
    KeywordAnswer {
        keywords: &["have you ever worked", "previously employed", "prior employment"],
        answer: "No",
    },
    KeywordAnswer {
        keywords: &["legally eligible", "authorized to work", "work authorization"],
        answer: "Yes",
    },
    KeywordAnswer {
        keywords: &["preferred location", "office location"],
        answer: "Flexible/Open to any location",
    },
    KeywordAnswer {
        keywords: &["family member", "familial relationship", "relative"],
        answer: "No",
    },
    KeywordAnswer {
        keywords: &["competing", "signed contract", "non-compete", "conflict of interest"],
        answer: "No",
    },
    KeywordAnswer {
        keywords: &["outside business", "investment", "vendor", "intellectual property"],
        answer: "No",
    },
    KeywordAnswer {
        keywords: &["used robinhood"],
        answer: "No",
    },
    KeywordAnswer {
        keywords: &["privacy policy"],
        answer: "Yes",
    },
];

pub fn hardcoded_answer(question: &str) -> Option<&'static str> {
    let question = question.to_lowercase();
    HARDCODED_ANSWERS
        .iter()
        .find(|entry| entry.keywords.iter().any(|k| question.contains(k)))
        .map(|entry| entry.answer)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemographicKey {
    Gender,
    Age,
    Race,
    Veteran,
    Disability,
    Lgbtq,
    Minority,
    Pronoun,
    Citizenship,
    Hispanic,
    Origin,
}

/// Substring probes in priority order. "sex" is checked before "age".
const DEMOGRAPHIC_KEYWORDS: &[(&[&str], DemographicKey)] = &[
    (&["gender", "sex"], DemographicKey::Gender),
    (&["age"], DemographicKey::Age),
    (&["race", "ethnic"], DemographicKey::Race),
    (&["veteran", "military"], DemographicKey::Veteran),
    (&["disab"], DemographicKey::Disability),
    (&["lgbt"], DemographicKey::Lgbtq),
    (&["minority"], DemographicKey::Minority),
    (&["pronoun"], DemographicKey::Pronoun),
    (&["citizen"], DemographicKey::Citizenship),
    (&["hispanic"], DemographicKey::Hispanic),
    (&["origin"], DemographicKey::Origin),
];

impl DemographicKey {
    pub fn default_answer(self) -> &'static str {
        match self {
            DemographicKey::Gender => "Male",
            DemographicKey::Age => "25-34",
            DemographicKey::Race => "Asian",
            DemographicKey::Veteran => "Never served",
            DemographicKey::Disability => "No",
            DemographicKey::Lgbtq => "No",
            DemographicKey::Minority => "No",
            DemographicKey::Pronoun => "He/Him",
            DemographicKey::Citizenship => "US Citizen",
            DemographicKey::Hispanic => "No",
            DemographicKey::Origin => "Not Hispanic or Latino",
        }
    }
}

pub fn demographic_key(question: &str) -> Option<DemographicKey> {
    let question = question.to_lowercase();
    DEMOGRAPHIC_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| question.contains(k)))
        .map(|(_, key)| *key)
}

pub fn demographic_answer(question: &str) -> Option<&'static str> {
    demographic_key(question).map(DemographicKey::default_answer)
}
