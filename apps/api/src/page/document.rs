//! Owned snapshot of an application page's form controls.
//!
//! `scraper::Html` is not `Send`, so parsing happens in one synchronous pass and
//! produces plain data that can cross `.await` points in handlers.
//!
//! Index spaces (the host enumerates the live DOM the same way):
//! - controls: `document.querySelectorAll("input, select, textarea")`
//! - buttons:  `document.querySelectorAll('button, input[type="submit"], input[type="button"], a, [role="button"]')`

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

/// Fallback question text when a control has no label, placeholder or name.
pub const DEFAULT_QUESTION: &str = "Please provide information";

/// Containers probed, in order, for the job description text.
const DESCRIPTION_SELECTORS: &[&str] = &[
    ".job-description",
    ".description",
    "[data-testid*=\"description\"]",
    ".content",
    "main",
    "article",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Input,
    Select,
    Textarea,
}

/// How a control is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Input,
    Select,
    Textarea,
    Radio,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub text: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct FormControl {
    pub index: usize,
    pub tag: Tag,
    /// Lowercased `type` attribute, if present.
    pub input_type: Option<String>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub placeholder: Option<String>,
    pub aria_label: Option<String>,
    pub title: Option<String>,
    pub accept: Option<String>,
    /// Resolved label text (see [`resolve_label`]).
    pub label: Option<String>,
    pub value: String,
    pub checked: bool,
    /// `required` attribute or `aria-required="true"`.
    pub required: bool,
    pub visible: bool,
    pub options: Vec<SelectOption>,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Input => "input",
            FieldKind::Select => "select",
            FieldKind::Textarea => "textarea",
            FieldKind::Radio => "radio",
            FieldKind::Checkbox => "checkbox",
        }
    }
}

impl FormControl {
    pub fn kind(&self) -> FieldKind {
        match self.tag {
            Tag::Select => FieldKind::Select,
            Tag::Textarea => FieldKind::Textarea,
            Tag::Input => match self.input_type.as_deref() {
                Some("radio") => FieldKind::Radio,
                Some("checkbox") => FieldKind::Checkbox,
                _ => FieldKind::Input,
            },
        }
    }

    pub fn is_type(&self, input_type: &str) -> bool {
        self.tag == Tag::Input && self.input_type.as_deref() == Some(input_type)
    }

    /// Text the applicant would read as the question: label, placeholder, name, or a default.
    pub fn question(&self) -> String {
        self.label
            .as_deref()
            .or(self.placeholder.as_deref())
            .or(self.name.as_deref())
            .unwrap_or(DEFAULT_QUESTION)
            .to_string()
    }

    /// Option texts of a select, trimmed.
    pub fn option_texts(&self) -> Vec<String> {
        self.options.iter().map(|o| o.text.trim().to_string()).collect()
    }

    /// Label for a radio/checkbox choice, falling back to its value.
    pub fn choice_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonTag {
    Button,
    Input,
    Link,
    RoleButton,
}

#[derive(Debug, Clone)]
pub struct ButtonElement {
    pub index: usize,
    pub tag: ButtonTag,
    /// Lowercased `type` attribute, if present.
    pub button_type: Option<String>,
    pub text: String,
    pub visible: bool,
}

#[derive(Debug, Clone)]
pub struct FormDocument {
    pub url: String,
    pub hostname: String,
    pub controls: Vec<FormControl>,
    pub buttons: Vec<ButtonElement>,
    pub description: String,
}

impl FormDocument {
    pub fn parse(url: &str, html: &str) -> Self {
        let document = Html::parse_document(html);
        let hostname = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase))
            .unwrap_or_default();

        let labels_by_for = collect_labels(&document);

        let controls = select_all(&document, "input, select, textarea")
            .enumerate()
            .filter_map(|(index, el)| parse_control(index, el, &labels_by_for))
            .collect();

        let buttons = select_all(&document, "button, input, a, [role=\"button\"]")
            .filter(|el| is_button_like(el))
            .enumerate()
            .map(|(index, el)| parse_button(index, el))
            .collect();

        let description = extract_description(&document);

        FormDocument {
            url: url.to_string(),
            hostname,
            controls,
            buttons,
            description,
        }
    }

    pub fn control(&self, index: usize) -> Option<&FormControl> {
        self.controls.get(index)
    }

    /// All radios sharing `name`, in document order.
    pub fn radio_group<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FormControl> + 'a {
        self.controls
            .iter()
            .filter(move |c| c.is_type("radio") && c.name.as_deref() == Some(name))
    }

    /// The radios a radio control stands for; a nameless radio is its own group.
    pub fn radio_choices<'a>(&'a self, control: &'a FormControl) -> Vec<&'a FormControl> {
        match control.name.as_deref() {
            Some(name) => self.radio_group(name).collect(),
            None => vec![control],
        }
    }

    /// Radios and checkboxes count as filled when checked; everything else when non-empty.
    pub fn is_filled(&self, control: &FormControl) -> bool {
        match control.kind() {
            FieldKind::Radio => self.radio_choices(control).iter().any(|r| r.checked),
            FieldKind::Checkbox => control.checked,
            _ => !control.value.is_empty(),
        }
    }

    /// Visible, empty controls that are marked required, deduplicated in document order.
    ///
    /// A control is required through `required`/`aria-required`, or when its label carries
    /// `*` or "required". Radio groups collapse to their first radio; file inputs are
    /// left to the resume upload step.
    pub fn unfilled_required(&self) -> Vec<usize> {
        let mut seen_groups: Vec<&str> = Vec::new();
        let mut result = Vec::new();

        for control in &self.controls {
            if !control.visible || control.is_type("file") || is_non_field_input(control) {
                continue;
            }
            if self.is_filled(control) {
                continue;
            }
            let label_marks_required = control
                .label
                .as_deref()
                .map(|l| l.contains('*') || l.to_lowercase().contains("required"))
                .unwrap_or(false);
            if !(control.required || label_marks_required) {
                continue;
            }
            if control.kind() == FieldKind::Radio {
                if let Some(name) = control.name.as_deref() {
                    if seen_groups.contains(&name) {
                        continue;
                    }
                    seen_groups.push(name);
                }
            }
            result.push(control.index);
        }

        result
    }

    pub fn set_value(&mut self, index: usize, value: &str) {
        if let Some(control) = self.controls.get_mut(index) {
            control.value = value.to_string();
        }
    }

    pub fn set_checked(&mut self, index: usize, checked: bool) {
        if let Some(control) = self.controls.get_mut(index) {
            control.checked = checked;
        }
    }

    /// Checks one radio and clears the rest of its group.
    pub fn check_radio(&mut self, index: usize) {
        let Some(name) = self.control(index).and_then(|c| c.name.clone()) else {
            self.set_checked(index, true);
            return;
        };
        for control in &mut self.controls {
            if control.is_type("radio") && control.name.as_deref() == Some(name.as_str()) {
                control.checked = control.index == index;
            }
        }
    }
}

fn select_all<'a>(document: &'a Html, css: &str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    let selector = Selector::parse(css).ok();
    selector
        .map(|s| document.select(&s).collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter()
}

/// Submit/button inputs and friends that are never answered.
fn is_non_field_input(control: &FormControl) -> bool {
    matches!(
        control.input_type.as_deref(),
        Some("submit" | "button" | "reset" | "image" | "hidden")
    ) && control.tag == Tag::Input
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(el: &ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

fn attr(el: &ElementRef<'_>, name: &str) -> Option<String> {
    el.value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// First `label[for]` text per id.
fn collect_labels(document: &Html) -> HashMap<String, String> {
    let mut labels = HashMap::new();
    for label in select_all(document, "label[for]") {
        if let Some(target) = label.value().attr("for") {
            labels
                .entry(target.to_string())
                .or_insert_with(|| element_text(&label));
        }
    }
    labels
}

/// `label[for=id]`, then the enclosing `<label>`, then `aria-label`, then `title`.
fn resolve_label(el: &ElementRef<'_>, labels_by_for: &HashMap<String, String>) -> Option<String> {
    if let Some(id) = el.value().attr("id") {
        if let Some(text) = labels_by_for.get(id) {
            return Some(text.clone());
        }
    }
    if let Some(parent_label) = el
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "label")
    {
        return Some(element_text(&parent_label));
    }
    attr(el, "aria-label").or_else(|| attr(el, "title"))
}

/// Stand-in for `offsetParent !== null`: hidden inputs, `hidden` attributes and inline
/// `display:none` on the element or any ancestor.
fn is_visible(el: &ElementRef<'_>) -> bool {
    if el.value().name() == "input"
        && el
            .value()
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
    {
        return false;
    }
    std::iter::once(*el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .all(|node| !hides(&node))
}

fn hides(el: &ElementRef<'_>) -> bool {
    if el.value().attr("hidden").is_some() {
        return true;
    }
    el.value()
        .attr("style")
        .map(|style| {
            let compact: String = style
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_lowercase();
            compact.contains("display:none")
        })
        .unwrap_or(false)
}

fn parse_control(
    index: usize,
    el: ElementRef<'_>,
    labels_by_for: &HashMap<String, String>,
) -> Option<FormControl> {
    let tag = match el.value().name() {
        "input" => Tag::Input,
        "select" => Tag::Select,
        "textarea" => Tag::Textarea,
        _ => return None,
    };
    let input_type = el.value().attr("type").map(|t| t.trim().to_lowercase());

    let options: Vec<SelectOption> = if tag == Tag::Select {
        let option_selector = Selector::parse("option").ok()?;
        el.select(&option_selector)
            .map(|opt| {
                let text = element_text(&opt);
                let value = opt
                    .value()
                    .attr("value")
                    .map(str::to_string)
                    .unwrap_or_else(|| text.clone());
                SelectOption { text, value }
            })
            .collect()
    } else {
        Vec::new()
    };

    let value = match tag {
        Tag::Select => {
            let option_selector = Selector::parse("option").ok()?;
            let selected = el
                .select(&option_selector)
                .position(|opt| opt.value().attr("selected").is_some());
            selected
                .or(if options.is_empty() { None } else { Some(0) })
                .and_then(|i| options.get(i))
                .map(|o| o.value.clone())
                .unwrap_or_default()
        }
        Tag::Textarea => el.text().collect::<String>(),
        Tag::Input => match el.value().attr("value") {
            Some(v) => v.to_string(),
            None if matches!(input_type.as_deref(), Some("radio" | "checkbox")) => {
                "on".to_string()
            }
            None => String::new(),
        },
    };

    let required = el.value().attr("required").is_some()
        || el
            .value()
            .attr("aria-required")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));

    Some(FormControl {
        index,
        tag,
        input_type,
        name: attr(&el, "name"),
        id: attr(&el, "id"),
        placeholder: attr(&el, "placeholder"),
        aria_label: attr(&el, "aria-label"),
        title: attr(&el, "title"),
        accept: attr(&el, "accept"),
        label: resolve_label(&el, labels_by_for),
        value,
        checked: el.value().attr("checked").is_some(),
        required,
        visible: is_visible(&el),
        options,
    })
}

fn is_button_like(el: &ElementRef<'_>) -> bool {
    match el.value().name() {
        "button" | "a" => true,
        "input" => el
            .value()
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("submit") || t.eq_ignore_ascii_case("button")),
        _ => el.value().attr("role") == Some("button"),
    }
}

fn parse_button(index: usize, el: ElementRef<'_>) -> ButtonElement {
    let tag = match el.value().name() {
        "button" => ButtonTag::Button,
        "input" => ButtonTag::Input,
        "a" => ButtonTag::Link,
        _ => ButtonTag::RoleButton,
    };
    let text = match tag {
        ButtonTag::Input => attr(&el, "value").unwrap_or_default(),
        _ => element_text(&el),
    };
    ButtonElement {
        index,
        tag,
        button_type: el.value().attr("type").map(|t| t.trim().to_lowercase()),
        text,
        visible: is_visible(&el),
    }
}

fn extract_description(document: &Html) -> String {
    for css in DESCRIPTION_SELECTORS {
        if let Some(el) = select_all(document, css).next() {
            return element_text(&el);
        }
    }
    select_all(document, "body")
        .next()
        .map(|body| element_text(&body))
        .unwrap_or_else(|| collapse_whitespace(&document.root_element().text().collect::<String>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"
        <html><body>
          <div class="job-description">Senior Data Engineer
             building pipelines</div>
          <form>
            <label for="fn">First name *</label>
            <input id="fn" name="first_name" type="text">
            <label>Email <input name="email" type="email" value="a@b.co"></label>
            <input name="phone" aria-label="Phone number" required>
            <input name="token" type="hidden" value="x">
            <div style="display: none"><input name="ghost"></div>
            <input name="secret" hidden>
            <select name="country" aria-required="true">
              <option value="">Select...</option>
              <option>Canada</option>
              <option value="us" selected>United States</option>
            </select>
            <textarea name="cover" placeholder="Why us?"></textarea>
            <input type="radio" name="sponsor" value="yes" id="sy"><label for="sy">Yes</label>
            <input type="radio" name="sponsor" value="no" id="sn"><label for="sn">No</label>
            <input type="checkbox" name="terms" title="Accept terms">
            <button type="button">Cancel</button>
            <input type="submit" value="Submit application">
            <a href="/next">Next</a>
          </form>
        </body></html>
    "#;

    fn doc() -> FormDocument {
        FormDocument::parse("https://boards.greenhouse.io/acme/jobs/1", FORM)
    }

    fn by_name<'a>(doc: &'a FormDocument, name: &str) -> &'a FormControl {
        doc.controls
            .iter()
            .find(|c| c.name.as_deref() == Some(name))
            .unwrap()
    }

    #[test]
    fn test_controls_in_document_order() {
        let doc = doc();
        assert_eq!(doc.controls.len(), 12);
        assert_eq!(doc.controls[0].name.as_deref(), Some("first_name"));
        assert!(doc.controls.iter().enumerate().all(|(i, c)| c.index == i));
        assert_eq!(doc.hostname, "boards.greenhouse.io");
    }

    #[test]
    fn test_label_resolution_order() {
        let doc = doc();
        assert_eq!(by_name(&doc, "first_name").label.as_deref(), Some("First name *"));
        assert_eq!(by_name(&doc, "email").label.as_deref(), Some("Email"));
        assert_eq!(by_name(&doc, "phone").label.as_deref(), Some("Phone number"));
        assert_eq!(by_name(&doc, "terms").label.as_deref(), Some("Accept terms"));
        assert_eq!(by_name(&doc, "cover").label, None);
    }

    #[test]
    fn test_question_falls_back_through_placeholder_and_name() {
        let doc = doc();
        assert_eq!(by_name(&doc, "cover").question(), "Why us?");
        assert_eq!(by_name(&doc, "ghost").question(), "ghost");
    }

    #[test]
    fn test_visibility() {
        let doc = doc();
        assert!(by_name(&doc, "first_name").visible);
        assert!(!by_name(&doc, "token").visible);
        assert!(!by_name(&doc, "ghost").visible);
        assert!(!by_name(&doc, "secret").visible);
    }

    #[test]
    fn test_select_value_and_options() {
        let doc = doc();
        let country = by_name(&doc, "country");
        assert_eq!(country.kind(), FieldKind::Select);
        assert_eq!(country.value, "us");
        assert_eq!(country.options[1].value, "Canada");
        assert_eq!(
            country.option_texts(),
            vec!["Select...", "Canada", "United States"]
        );
        assert!(country.required);
    }

    #[test]
    fn test_select_without_selected_option_takes_first() {
        let doc = FormDocument::parse(
            "https://x.test",
            r#"<select name="s"><option value="">--</option><option>A</option></select>"#,
        );
        assert_eq!(doc.controls[0].value, "");
    }

    #[test]
    fn test_checkbox_and_radio_defaults() {
        let doc = doc();
        let terms = by_name(&doc, "terms");
        assert_eq!(terms.kind(), FieldKind::Checkbox);
        assert_eq!(terms.value, "on");
        assert!(!terms.checked);
        let radios: Vec<_> = doc.radio_group("sponsor").collect();
        assert_eq!(radios.len(), 2);
        assert_eq!(radios[1].choice_label(), "No");
    }

    #[test]
    fn test_unfilled_required_collects_marked_fields() {
        let doc = doc();
        let names: Vec<_> = doc
            .unfilled_required()
            .into_iter()
            .map(|i| doc.controls[i].name.clone().unwrap())
            .collect();
        // first_name via "*", phone via required; country is pre-selected, email has a value.
        assert_eq!(names, vec!["first_name", "phone"]);
    }

    #[test]
    fn test_radio_group_collapses_and_clears_when_checked() {
        let mut doc = FormDocument::parse(
            "https://x.test",
            r#"<input type="radio" name="g" value="a" required>
               <input type="radio" name="g" value="b" required>"#,
        );
        assert_eq!(doc.unfilled_required(), vec![0]);
        doc.check_radio(1);
        assert!(doc.unfilled_required().is_empty());
        assert!(!doc.controls[0].checked);
        assert!(doc.controls[1].checked);
    }

    #[test]
    fn test_buttons_enumerated_with_text() {
        let doc = doc();
        let texts: Vec<_> = doc.buttons.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["Cancel", "Submit application", "Next"]);
        assert_eq!(doc.buttons[1].tag, ButtonTag::Input);
        assert_eq!(doc.buttons[2].tag, ButtonTag::Link);
    }

    #[test]
    fn test_description_prefers_job_description_container() {
        assert_eq!(doc().description, "Senior Data Engineer building pipelines");
    }

    #[test]
    fn test_description_falls_back_to_body() {
        let doc = FormDocument::parse("https://x.test", "<body><p>Hello   world</p></body>");
        assert_eq!(doc.description, "Hello world");
    }
}
