use std::fmt;

use serde::Serialize;

/// Applicant tracking system hosting the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Workday,
    Greenhouse,
    Lever,
    BambooHr,
    Icims,
    SmartRecruiters,
    Jobvite,
    Bullhorn,
    Workable,
    Breezy,
    Recruitee,
    Personio,
    Bamboo,
    Fountain,
    Ashby,
    General,
}

/// Checked in order; `bamboohr` must precede `bamboo`.
const PLATFORM_KEYWORDS: &[(&str, Platform)] = &[
    ("workday", Platform::Workday),
    ("greenhouse", Platform::Greenhouse),
    ("lever", Platform::Lever),
    ("bamboohr", Platform::BambooHr),
    ("icims", Platform::Icims),
    ("smartrecruiters", Platform::SmartRecruiters),
    ("jobvite", Platform::Jobvite),
    ("bullhorn", Platform::Bullhorn),
    ("workable", Platform::Workable),
    ("breezy", Platform::Breezy),
    ("recruitee", Platform::Recruitee),
    ("personio", Platform::Personio),
    ("bamboo", Platform::Bamboo),
    ("fountain", Platform::Fountain),
    ("ashby", Platform::Ashby),
];

const JOB_PAGE_KEYWORDS: &[&str] = &[
    "apply",
    "application",
    "careers",
    "jobs",
    "workday",
    "greenhouse",
    "lever",
    "bamboohr",
    "icims",
    "smartrecruiters",
    "jobvite",
];

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Workday => "workday",
            Platform::Greenhouse => "greenhouse",
            Platform::Lever => "lever",
            Platform::BambooHr => "bamboohr",
            Platform::Icims => "icims",
            Platform::SmartRecruiters => "smartrecruiters",
            Platform::Jobvite => "jobvite",
            Platform::Bullhorn => "bullhorn",
            Platform::Workable => "workable",
            Platform::Breezy => "breezy",
            Platform::Recruitee => "recruitee",
            Platform::Personio => "personio",
            Platform::Bamboo => "bamboo",
            Platform::Fountain => "fountain",
            Platform::Ashby => "ashby",
            Platform::General => "general",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names the platform from the hostname or anywhere in the URL.
pub fn detect_platform(page_url: &str) -> Platform {
    let full = page_url.to_lowercase();
    let hostname = url::Url::parse(page_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default();

    PLATFORM_KEYWORDS
        .iter()
        .find(|(keyword, _)| hostname.contains(keyword) || full.contains(keyword))
        .map(|(_, platform)| *platform)
        .unwrap_or(Platform::General)
}

pub fn is_job_application_page(page_url: &str) -> bool {
    let full = page_url.to_lowercase();
    JOB_PAGE_KEYWORDS.iter().any(|k| full.contains(k))
}
