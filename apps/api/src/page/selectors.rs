//! Locator tables for the basic profile fields and the resume upload control.
//!
//! Each `FieldSelector` is one attribute selector such as `input[name*="first" i]`
//! (`Contains`, case-insensitive) or `input[name="firstName"]` (`Equals`).

use serde::Serialize;

use crate::page::document::{FormControl, FormDocument, Tag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr {
    Name,
    Id,
    Placeholder,
    Type,
    Accept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Contains(&'static str),
    Equals(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelector {
    pub tag: Tag,
    pub attr: Attr,
    pub pattern: Pattern,
}

const fn has(tag: Tag, attr: Attr, needle: &'static str) -> FieldSelector {
    FieldSelector {
        tag,
        attr,
        pattern: Pattern::Contains(needle),
    }
}

const fn is(tag: Tag, attr: Attr, value: &'static str) -> FieldSelector {
    FieldSelector {
        tag,
        attr,
        pattern: Pattern::Equals(value),
    }
}

use Attr::{Accept, Id, Name, Placeholder, Type};
use Tag::{Input, Select, Textarea};

impl FieldSelector {
    pub fn matches(&self, control: &FormControl) -> bool {
        if control.tag != self.tag {
            return false;
        }
        let value = match self.attr {
            Attr::Name => control.name.as_deref(),
            Attr::Id => control.id.as_deref(),
            Attr::Placeholder => control.placeholder.as_deref(),
            Attr::Type => control.input_type.as_deref(),
            Attr::Accept => control.accept.as_deref(),
        };
        let Some(value) = value else {
            return false;
        };
        match self.pattern {
            Pattern::Contains(needle) => value.to_lowercase().contains(needle),
            // `type` values are ASCII case-insensitive in HTML.
            Pattern::Equals(expected) if self.attr == Attr::Type => {
                value.eq_ignore_ascii_case(expected)
            }
            Pattern::Equals(expected) => value == expected,
        }
    }
}

/// Profile fields filled directly, before any question handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BasicField {
    FirstName,
    LastName,
    FullName,
    Email,
    Phone,
    Address,
    City,
    State,
    ZipCode,
    Country,
    Linkedin,
    Github,
    Website,
    CurrentCompany,
    CurrentTitle,
    Experience,
    Education,
    Salary,
    Availability,
}

impl BasicField {
    /// Fill order.
    pub const ALL: [BasicField; 19] = [
        BasicField::FirstName,
        BasicField::LastName,
        BasicField::FullName,
        BasicField::Email,
        BasicField::Phone,
        BasicField::Address,
        BasicField::City,
        BasicField::State,
        BasicField::ZipCode,
        BasicField::Country,
        BasicField::Linkedin,
        BasicField::Github,
        BasicField::Website,
        BasicField::CurrentCompany,
        BasicField::CurrentTitle,
        BasicField::Experience,
        BasicField::Education,
        BasicField::Salary,
        BasicField::Availability,
    ];

    /// Key of this field in the stored profile.
    pub fn profile_key(self) -> &'static str {
        match self {
            BasicField::FirstName => "firstName",
            BasicField::LastName => "lastName",
            BasicField::FullName => "fullName",
            BasicField::Email => "email",
            BasicField::Phone => "phone",
            BasicField::Address => "address",
            BasicField::City => "city",
            BasicField::State => "state",
            BasicField::ZipCode => "zipCode",
            BasicField::Country => "country",
            BasicField::Linkedin => "linkedin",
            BasicField::Github => "github",
            BasicField::Website => "website",
            BasicField::CurrentCompany => "currentCompany",
            BasicField::CurrentTitle => "currentTitle",
            BasicField::Experience => "experience",
            BasicField::Education => "education",
            BasicField::Salary => "salary",
            BasicField::Availability => "availability",
        }
    }

    pub fn selectors(self) -> &'static [FieldSelector] {
        match self {
            BasicField::FirstName => FIRST_NAME,
            BasicField::LastName => LAST_NAME,
            BasicField::FullName => FULL_NAME,
            BasicField::Email => EMAIL,
            BasicField::Phone => PHONE,
            BasicField::Address => ADDRESS,
            BasicField::City => CITY,
            BasicField::State => STATE,
            BasicField::ZipCode => ZIP_CODE,
            BasicField::Country => COUNTRY,
            BasicField::Linkedin => LINKEDIN,
            BasicField::Github => GITHUB,
            BasicField::Website => WEBSITE,
            BasicField::CurrentCompany => CURRENT_COMPANY,
            BasicField::CurrentTitle => CURRENT_TITLE,
            BasicField::Experience => EXPERIENCE,
            BasicField::Education => EDUCATION,
            BasicField::Salary => SALARY,
            BasicField::Availability => AVAILABILITY,
        }
    }
}

const FIRST_NAME: &[FieldSelector] = &[
    has(Input, Name, "first"),
    has(Input, Name, "firstname"),
    has(Input, Name, "first_name"),
    has(Input, Id, "first"),
    has(Input, Id, "firstname"),
    has(Input, Id, "first_name"),
    has(Input, Placeholder, "first"),
    has(Input, Placeholder, "first name"),
    is(Input, Name, "firstName"),
    is(Input, Name, "first_name"),
    is(Input, Name, "firstname"),
];

const LAST_NAME: &[FieldSelector] = &[
    has(Input, Name, "last"),
    has(Input, Name, "lastname"),
    has(Input, Name, "last_name"),
    has(Input, Id, "last"),
    has(Input, Id, "lastname"),
    has(Input, Id, "last_name"),
    has(Input, Placeholder, "last"),
    has(Input, Placeholder, "last name"),
    is(Input, Name, "lastName"),
    is(Input, Name, "last_name"),
    is(Input, Name, "lastname"),
];

const FULL_NAME: &[FieldSelector] = &[
    has(Input, Name, "name"),
    has(Input, Name, "fullname"),
    has(Input, Name, "full_name"),
    has(Input, Id, "name"),
    has(Input, Id, "fullname"),
    has(Input, Id, "full_name"),
    has(Input, Placeholder, "name"),
    has(Input, Placeholder, "full name"),
    is(Input, Name, "name"),
    is(Input, Name, "fullName"),
    is(Input, Name, "full_name"),
];

const EMAIL: &[FieldSelector] = &[
    is(Input, Type, "email"),
    has(Input, Name, "email"),
    has(Input, Id, "email"),
    has(Input, Placeholder, "email"),
    is(Input, Name, "email"),
    is(Input, Name, "e-mail"),
];

const PHONE: &[FieldSelector] = &[
    is(Input, Type, "tel"),
    has(Input, Name, "phone"),
    has(Input, Name, "mobile"),
    has(Input, Name, "cell"),
    has(Input, Id, "phone"),
    has(Input, Id, "mobile"),
    has(Input, Id, "cell"),
    has(Input, Placeholder, "phone"),
    has(Input, Placeholder, "mobile"),
    has(Input, Placeholder, "cell"),
    is(Input, Name, "phone"),
    is(Input, Name, "mobile"),
    is(Input, Name, "cell"),
    is(Input, Name, "telephone"),
];

const ADDRESS: &[FieldSelector] = &[
    has(Input, Name, "address"),
    has(Textarea, Name, "address"),
    has(Input, Id, "address"),
    has(Textarea, Id, "address"),
    has(Input, Placeholder, "address"),
    has(Textarea, Placeholder, "address"),
    is(Input, Name, "address"),
    is(Input, Name, "street"),
];

const CITY: &[FieldSelector] = &[
    has(Input, Name, "city"),
    has(Input, Id, "city"),
    has(Input, Placeholder, "city"),
    is(Input, Name, "city"),
    is(Input, Name, "town"),
];

const STATE: &[FieldSelector] = &[
    has(Input, Name, "state"),
    has(Select, Name, "state"),
    has(Input, Id, "state"),
    has(Select, Id, "state"),
    has(Input, Placeholder, "state"),
    is(Input, Name, "state"),
    is(Input, Name, "province"),
    is(Input, Name, "region"),
];

const ZIP_CODE: &[FieldSelector] = &[
    has(Input, Name, "zip"),
    has(Input, Name, "postal"),
    has(Input, Id, "zip"),
    has(Input, Id, "postal"),
    has(Input, Placeholder, "zip"),
    has(Input, Placeholder, "postal"),
    is(Input, Name, "zip"),
    is(Input, Name, "zipcode"),
    is(Input, Name, "postal"),
    is(Input, Name, "postal_code"),
];

const COUNTRY: &[FieldSelector] = &[
    has(Input, Name, "country"),
    has(Select, Name, "country"),
    has(Input, Id, "country"),
    has(Select, Id, "country"),
    has(Input, Placeholder, "country"),
    is(Input, Name, "country"),
    is(Input, Name, "nation"),
];

const LINKEDIN: &[FieldSelector] = &[
    has(Input, Name, "linkedin"),
    has(Input, Name, "linked"),
    has(Input, Id, "linkedin"),
    has(Input, Placeholder, "linkedin"),
    is(Input, Name, "linkedin"),
    is(Input, Name, "linkedin_url"),
];

const GITHUB: &[FieldSelector] = &[
    has(Input, Name, "github"),
    has(Input, Name, "git"),
    has(Input, Id, "github"),
    has(Input, Placeholder, "github"),
    is(Input, Name, "github"),
    is(Input, Name, "github_url"),
];

const WEBSITE: &[FieldSelector] = &[
    has(Input, Name, "website"),
    has(Input, Name, "url"),
    has(Input, Name, "portfolio"),
    has(Input, Id, "website"),
    has(Input, Id, "url"),
    has(Input, Placeholder, "website"),
    has(Input, Placeholder, "url"),
    is(Input, Name, "website"),
    is(Input, Name, "url"),
    is(Input, Name, "portfolio"),
];

const CURRENT_COMPANY: &[FieldSelector] = &[
    has(Input, Name, "company"),
    has(Input, Name, "employer"),
    has(Input, Id, "company"),
    has(Input, Placeholder, "company"),
    has(Input, Placeholder, "current company"),
    is(Input, Name, "company"),
    is(Input, Name, "employer"),
    is(Input, Name, "current_company"),
];

const CURRENT_TITLE: &[FieldSelector] = &[
    has(Input, Name, "title"),
    has(Input, Name, "position"),
    has(Input, Name, "job"),
    has(Input, Id, "title"),
    has(Input, Id, "position"),
    has(Input, Placeholder, "title"),
    has(Input, Placeholder, "position"),
    is(Input, Name, "title"),
    is(Input, Name, "position"),
    is(Input, Name, "job_title"),
];

const EXPERIENCE: &[FieldSelector] = &[
    has(Input, Name, "experience"),
    has(Select, Name, "experience"),
    has(Input, Id, "experience"),
    has(Select, Id, "experience"),
    has(Input, Placeholder, "experience"),
    is(Input, Name, "experience"),
    is(Input, Name, "years_experience"),
];

const EDUCATION: &[FieldSelector] = &[
    has(Input, Name, "education"),
    has(Select, Name, "education"),
    has(Input, Id, "education"),
    has(Select, Id, "education"),
    has(Input, Placeholder, "education"),
    is(Input, Name, "education"),
    is(Input, Name, "degree"),
];

const SALARY: &[FieldSelector] = &[
    has(Input, Name, "salary"),
    has(Input, Name, "compensation"),
    has(Input, Id, "salary"),
    has(Input, Placeholder, "salary"),
    has(Input, Placeholder, "compensation"),
    is(Input, Name, "salary"),
    is(Input, Name, "compensation"),
    is(Input, Name, "expected_salary"),
];

const AVAILABILITY: &[FieldSelector] = &[
    has(Input, Name, "availability"),
    has(Select, Name, "availability"),
    has(Input, Id, "availability"),
    has(Select, Id, "availability"),
    has(Input, Placeholder, "availability"),
    is(Input, Name, "availability"),
    is(Input, Name, "start_date"),
];

/// Resume upload control locators.
pub const FILE_UPLOAD: &[FieldSelector] = &[
    is(Input, Type, "file"),
    has(Input, Accept, "pdf"),
    has(Input, Accept, "doc"),
    has(Input, Name, "resume"),
    has(Input, Name, "cv"),
    has(Input, Id, "resume"),
    has(Input, Id, "cv"),
];

/// First visible control matched by the earliest selector, skipping rejected indices.
pub fn find_control<'a>(
    doc: &'a FormDocument,
    selectors: &[FieldSelector],
    mut skip: impl FnMut(usize) -> bool,
) -> Option<&'a FormControl> {
    selectors.iter().find_map(|selector| {
        doc.controls
            .iter()
            .find(|c| c.visible && !skip(c.index) && selector.matches(c))
    })
}
