//! The applicator: one pass over a page, producing a fill plan.
//!
//! Phases run in a fixed order (page-load wait, basic profile fields, required
//! questions, resume upload, navigation). Every emitted action is applied to the
//! working copy of the document, so later phases see what earlier ones filled.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::autofill::answers::{demographic_answer, hardcoded_answer};
use crate::autofill::option_match::{
    checkbox_should_check, fuzzy_match_option, resolve_radio, resolve_select_option,
};
use crate::autofill::plan::{
    AnswerSource, AnsweredField, ClickTarget, FillAction, FillPlan, Navigation, UnfilledField,
    WaitReason,
};
use crate::autofill::profile_fields::profile_value_for_field;
use crate::autofill::prompts::{checkbox_prompt, field_prompt, option_choice_prompt};
use crate::autofill::resume_select::select_resume;
use crate::config::Config;
use crate::llm_client::AnswerGenerator;
use crate::models::{Profile, StoredResume};
use crate::page::document::{FieldKind, FormControl, FormDocument};
use crate::page::navigation::{find_next_button, find_submit_button};
use crate::page::selectors::{find_control, BasicField, FILE_UPLOAD};
use crate::storage::validation::parse_data_uri;

/// Throwaway question used to check the LLM at the start of a run.
pub const PROBE_QUESTION: &str = "What is a dog?";

#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub max_steps: u32,
    pub auto_submit: bool,
    pub upload_settle_ms: u64,
    pub page_load_timeout_ms: u64,
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_steps: config.max_steps,
            auto_submit: config.auto_submit,
            upload_settle_ms: config.upload_settle_ms,
            page_load_timeout_ms: config.page_load_timeout_ms,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("Maximum steps ({max}) reached")]
    StepLimit { step: u32, max: u32 },
}

/// Result of trying to put a value into one control.
enum Fill {
    Applied(FillAction),
    /// The control already holds the wanted state.
    Unchanged,
    NoMatch,
}

pub struct AutoApplicator<'a> {
    profile: &'a Profile,
    resumes: &'a [StoredResume],
    llm: Option<&'a dyn AnswerGenerator>,
    settings: EngineSettings,
}

impl<'a> AutoApplicator<'a> {
    pub fn new(
        profile: &'a Profile,
        resumes: &'a [StoredResume],
        llm: Option<&'a dyn AnswerGenerator>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            profile,
            resumes,
            llm,
            settings,
        }
    }

    /// Runs one page pass. `step` counts passes already made for this application.
    pub async fn run(&self, mut doc: FormDocument, step: u32) -> Result<FillPlan, EngineError> {
        if step >= self.settings.max_steps {
            return Err(EngineError::StepLimit {
                step,
                max: self.settings.max_steps,
            });
        }

        info!(host = %doc.hostname, "Processing page {} (step {step})", doc.url);
        let mut plan = FillPlan::new(step);
        plan.actions.push(FillAction::Wait {
            millis: self.settings.page_load_timeout_ms,
            reason: WaitReason::PageLoad,
        });

        self.fill_basic_fields(&mut doc, &mut plan);
        self.answer_required_fields(&mut doc, &mut plan).await;
        self.attach_resume(&mut doc, &mut plan);
        self.choose_navigation(&doc, &mut plan);

        Ok(plan)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Phases
    // ────────────────────────────────────────────────────────────────────────

    fn fill_basic_fields(&self, doc: &mut FormDocument, plan: &mut FillPlan) {
        let mut claimed: HashSet<usize> = HashSet::new();

        for field in BasicField::ALL {
            let Some(value) = self.profile.get(field.profile_key()) else {
                continue;
            };
            let Some(control) = find_control(doc, field.selectors(), |i| claimed.contains(&i))
            else {
                continue;
            };
            let index = control.index;
            let question = control.question();

            match plan_fill(doc, control, value) {
                Fill::Applied(action) => {
                    emit(doc, plan, action);
                    claimed.insert(index);
                    info!("Filled {}: {value}", field.profile_key());
                    plan.answers.push(AnsweredField {
                        index,
                        question,
                        answer: value.to_string(),
                        source: AnswerSource::Profile,
                    });
                }
                Fill::Unchanged => {
                    claimed.insert(index);
                }
                Fill::NoMatch => {
                    warn!("No matching option for {} = '{value}'", field.profile_key());
                }
            }
        }

        info!("Filled {} basic fields", claimed.len());
    }

    async fn answer_required_fields(&self, doc: &mut FormDocument, plan: &mut FillPlan) {
        let required = doc.unfilled_required();
        info!("Handling {} required fields", required.len());

        for index in required {
            let Some(control) = doc.control(index).cloned() else {
                continue;
            };
            let question = control.question();

            let resolved = match control.kind() {
                FieldKind::Select | FieldKind::Radio => {
                    self.answer_choice(doc, &control, &question).await
                }
                FieldKind::Checkbox => self.answer_checkbox(&control, &question).await,
                FieldKind::Input | FieldKind::Textarea => {
                    self.answer_text(doc, &control, &question).await
                }
            };

            let Some((answer, source)) = resolved else {
                warn!("No answer for '{question}', skipping");
                continue;
            };

            match plan_fill(doc, &control, &answer) {
                Fill::Applied(action) => emit(doc, plan, action),
                Fill::Unchanged => {}
                Fill::NoMatch => {
                    warn!("Answer '{answer}' fits no choice of '{question}'");
                    continue;
                }
            }

            info!(?source, "Field: {question} | Answer: {answer}");
            plan.answers.push(AnsweredField {
                index,
                question,
                answer,
                source,
            });
        }
    }

    fn attach_resume(&self, doc: &mut FormDocument, plan: &mut FillPlan) {
        let Some(index) = find_control(doc, FILE_UPLOAD, |_| false).map(|c| c.index) else {
            info!("No file upload field found");
            return;
        };
        let Some(resume) = select_resume(&doc.description, self.resumes) else {
            info!("No resumes available");
            return;
        };

        let decoded = match parse_data_uri(&resume.file) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("Failed to upload resume '{}': {e}", resume.name);
                return;
            }
        };
        let mime_type = if decoded.mime_type.is_empty() {
            resume.mime_type.clone()
        } else {
            decoded.mime_type
        };

        emit(
            doc,
            plan,
            FillAction::UploadFile {
                index,
                file_name: resume.file_name(),
                mime_type,
                data_uri: resume.file.clone(),
            },
        );
        plan.actions.push(FillAction::Wait {
            millis: self.settings.upload_settle_ms,
            reason: WaitReason::UploadSettle,
        });
        info!("Uploaded resume: {}", resume.name);
    }

    fn choose_navigation(&self, doc: &FormDocument, plan: &mut FillPlan) {
        plan.unfilled_required = doc
            .unfilled_required()
            .into_iter()
            .filter_map(|i| doc.control(i))
            .map(|c| UnfilledField {
                index: c.index,
                question: c.question(),
            })
            .collect();

        if !plan.unfilled_required.is_empty() {
            warn!(
                "Some required fields are still unfilled: {:?}",
                plan.unfilled_required
                    .iter()
                    .map(|f| f.question.as_str())
                    .collect::<Vec<_>>()
            );
            plan.navigation = Navigation::AwaitingInput;
            return;
        }
        if !self.settings.auto_submit {
            plan.navigation = Navigation::Disabled;
            return;
        }

        let (button, target) = match find_submit_button(doc) {
            Some(button) => (button, ClickTarget::Submit),
            None => match find_next_button(doc) {
                Some(button) => (button, ClickTarget::Next),
                None => {
                    info!("No submit or next button found");
                    plan.navigation = Navigation::NoButton;
                    return;
                }
            },
        };

        info!("Clicking {target:?} button '{}'", button.text);
        plan.actions.push(FillAction::Click {
            button_index: button.index,
            target,
        });
        plan.navigation = match target {
            ClickTarget::Submit => Navigation::Submit,
            ClickTarget::Next => Navigation::Next,
        };
    }

    // ────────────────────────────────────────────────────────────────────────
    // Answer resolution
    // ────────────────────────────────────────────────────────────────────────

    /// Hardcoded table, then demographic defaults, then the profile.
    fn local_answer(&self, question: &str, control: &FormControl) -> Option<(String, AnswerSource)> {
        if let Some(answer) = hardcoded_answer(question) {
            return Some((answer.to_string(), AnswerSource::Hardcoded));
        }
        if let Some(answer) = demographic_answer(question) {
            return Some((answer.to_string(), AnswerSource::Demographic));
        }
        profile_value_for_field(self.profile, control).map(|v| (v, AnswerSource::Profile))
    }

    async fn answer_choice(
        &self,
        doc: &FormDocument,
        control: &FormControl,
        question: &str,
    ) -> Option<(String, AnswerSource)> {
        let options: Vec<String> = match control.kind() {
            FieldKind::Select => control.option_texts(),
            _ => doc
                .radio_choices(control)
                .iter()
                .map(|r| r.choice_label().to_string())
                .collect(),
        };

        if let Some((local, source)) = self.local_answer(question, control) {
            if let Some(option) = fuzzy_match_option(&options, &local) {
                return Some((option.to_string(), source));
            }
        }

        let llm = self.llm?;
        let prompt = option_choice_prompt(question, &options);
        debug!(%prompt, "Asking LLM to pick an option");
        let reply = llm.generate_answer(question, &prompt).await;
        debug!(%reply, "LLM reply");

        match fuzzy_match_option(&options, &reply) {
            Some(option) => Some((option.to_string(), AnswerSource::Llm)),
            None => {
                warn!(
                    "Could not match any option for '{question}'. Options: {}",
                    options.join(", ")
                );
                None
            }
        }
    }

    async fn answer_checkbox(
        &self,
        control: &FormControl,
        question: &str,
    ) -> Option<(String, AnswerSource)> {
        if let Some(local) = self.local_answer(question, control) {
            return Some(local);
        }
        let llm = self.llm?;
        let prompt = checkbox_prompt(question);
        debug!(%prompt, "Asking LLM about a checkbox");
        Some((llm.generate_answer(question, &prompt).await, AnswerSource::Llm))
    }

    async fn answer_text(
        &self,
        doc: &FormDocument,
        control: &FormControl,
        question: &str,
    ) -> Option<(String, AnswerSource)> {
        if let Some(local) = self.local_answer(question, control) {
            return Some(local);
        }
        let llm = self.llm?;
        let prompt = field_prompt(question, doc, control, self.profile);
        debug!(%prompt, "Asking LLM for a free-text answer");
        let reply = llm.generate_answer(question, &prompt).await;
        debug!(%reply, "LLM reply");
        Some((reply, AnswerSource::Llm))
    }
}

/// Asks the probe question and logs the reply.
pub async fn probe_llm(llm: &dyn AnswerGenerator) {
    let answer = llm.generate_answer(PROBE_QUESTION, "").await;
    info!("[LLM probe] Q: {PROBE_QUESTION} | A: {answer}");
}

/// Works out the action that puts `value` into `control`, without applying it.
fn plan_fill(doc: &FormDocument, control: &FormControl, value: &str) -> Fill {
    if value.trim().is_empty() {
        return Fill::NoMatch;
    }
    let index = control.index;

    match control.kind() {
        FieldKind::Select => match resolve_select_option(control, value) {
            Some(option) => Fill::Applied(FillAction::SelectOption {
                index,
                value: option.value.clone(),
            }),
            None => Fill::NoMatch,
        },
        FieldKind::Radio => match resolve_radio(&doc.radio_choices(control), value) {
            Some(radio) if radio.checked => Fill::Unchanged,
            Some(radio) => Fill::Applied(FillAction::CheckRadio { index: radio.index }),
            None => Fill::NoMatch,
        },
        FieldKind::Checkbox => {
            let checked = checkbox_should_check(control, value);
            if checked == control.checked {
                Fill::Unchanged
            } else {
                Fill::Applied(FillAction::SetChecked { index, checked })
            }
        }
        FieldKind::Input | FieldKind::Textarea => Fill::Applied(FillAction::SetValue {
            index,
            value: value.to_string(),
        }),
    }
}

/// Appends the action and mirrors it onto the working copy.
fn emit(doc: &mut FormDocument, plan: &mut FillPlan, action: FillAction) {
    match &action {
        FillAction::SetValue { index, value } | FillAction::SelectOption { index, value } => {
            doc.set_value(*index, value)
        }
        FillAction::CheckRadio { index } => doc.check_radio(*index),
        FillAction::SetChecked { index, checked } => doc.set_checked(*index, *checked),
        FillAction::UploadFile {
            index, file_name, ..
        } => doc.set_value(*index, file_name),
        FillAction::Wait { .. } | FillAction::Click { .. } => {}
    }
    plan.actions.push(action);
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;

    struct StubGenerator {
        reply: String,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl StubGenerator {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AnswerGenerator for StubGenerator {
        async fn generate_answer(&self, question: &str, context: &str) -> String {
            self.calls
                .lock()
                .unwrap()
                .push((question.to_string(), context.to_string()));
            self.reply.clone()
        }
    }

    const PAGE: &str = r#"
        <html><body>
          <div class="job-description">We are hiring a Software Engineer</div>
          <form>
            <input name="first_name" id="first_name">
            <input name="last_name">
            <input type="email" name="email">
            <input type="tel" name="phone_number">
            <label for="auth">Are you legally authorized to work in the US? *</label>
            <select id="auth" name="q_auth">
              <option value="">Select...</option>
              <option value="y">Yes</option>
              <option value="n">No</option>
            </select>
            <label for="gender">Gender</label>
            <select id="gender" name="eeo_gender" required>
              <option value="">Decline</option>
              <option value="m">Male</option>
              <option value="f">Female</option>
            </select>
            <label for="why">Why do you want to work here? *</label>
            <textarea id="why" name="why"></textarea>
            <input type="checkbox" name="privacy" id="privacy" required>
            <label for="privacy">I accept the privacy policy</label>
            <input type="file" name="resume">
            <button type="submit">Submit application</button>
          </form>
        </body></html>
    "#;

    fn profile() -> Profile {
        [
            ("firstName", "Ada"),
            ("lastName", "Lovelace"),
            ("email", "ada@example.com"),
            ("phone", "555-0100"),
        ]
        .into_iter()
        .collect()
    }

    fn resumes() -> Vec<StoredResume> {
        vec![StoredResume {
            name: "Software CV".to_string(),
            file: "data:application/pdf;base64,JVBERi0=".to_string(),
            mime_type: "application/pdf".to_string(),
            size: 5,
            upload_date: Utc::now(),
        }]
    }

    fn settings() -> EngineSettings {
        EngineSettings::from(&Config::default())
    }

    fn doc(html: &str) -> FormDocument {
        FormDocument::parse("https://boards.greenhouse.io/acme/jobs/1", html)
    }

    #[tokio::test]
    async fn test_full_pass_with_llm() {
        let profile = profile();
        let resumes = resumes();
        let llm = StubGenerator::new("I love the mission.");
        let applicator = AutoApplicator::new(&profile, &resumes, Some(&llm), settings());

        let plan = applicator.run(doc(PAGE), 0).await.unwrap();

        assert_eq!(
            plan.actions,
            vec![
                FillAction::Wait {
                    millis: 5000,
                    reason: WaitReason::PageLoad
                },
                FillAction::SetValue {
                    index: 0,
                    value: "Ada".into()
                },
                FillAction::SetValue {
                    index: 1,
                    value: "Lovelace".into()
                },
                FillAction::SetValue {
                    index: 2,
                    value: "ada@example.com".into()
                },
                FillAction::SetValue {
                    index: 3,
                    value: "555-0100".into()
                },
                FillAction::SelectOption {
                    index: 4,
                    value: "y".into()
                },
                FillAction::SelectOption {
                    index: 5,
                    value: "m".into()
                },
                FillAction::SetValue {
                    index: 6,
                    value: "I love the mission.".into()
                },
                FillAction::SetChecked {
                    index: 7,
                    checked: true
                },
                FillAction::UploadFile {
                    index: 8,
                    file_name: "Software_CV.pdf".into(),
                    mime_type: "application/pdf".into(),
                    data_uri: "data:application/pdf;base64,JVBERi0=".into(),
                },
                FillAction::Wait {
                    millis: 3000,
                    reason: WaitReason::UploadSettle
                },
                FillAction::Click {
                    button_index: 0,
                    target: ClickTarget::Submit
                },
            ]
        );
        assert_eq!(plan.navigation, Navigation::Submit);
        assert!(plan.unfilled_required.is_empty());

        let sources: Vec<_> = plan.answers.iter().map(|a| (a.index, a.source)).collect();
        assert_eq!(
            sources,
            vec![
                (0, AnswerSource::Profile),
                (1, AnswerSource::Profile),
                (2, AnswerSource::Profile),
                (3, AnswerSource::Profile),
                (4, AnswerSource::Hardcoded),
                (5, AnswerSource::Demographic),
                (6, AnswerSource::Llm),
                (7, AnswerSource::Hardcoded),
            ]
        );

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "Why do you want to work here? *");
        assert!(calls[0].1.contains("Field Type: textarea"));
    }

    #[tokio::test]
    async fn test_without_llm_unanswered_fields_block_navigation() {
        let profile = profile();
        let resumes = resumes();
        let applicator = AutoApplicator::new(&profile, &resumes, None, settings());

        let plan = applicator.run(doc(PAGE), 0).await.unwrap();

        assert_eq!(plan.navigation, Navigation::AwaitingInput);
        assert_eq!(
            plan.unfilled_required,
            vec![UnfilledField {
                index: 6,
                question: "Why do you want to work here? *".into()
            }]
        );
        assert!(!plan
            .actions
            .iter()
            .any(|a| matches!(a, FillAction::Click { .. })));
        assert!(!plan.answers.iter().any(|a| a.index == 6));
    }

    #[tokio::test]
    async fn test_radio_answered_by_llm_choice() {
        let profile = Profile::new();
        let llm = StubGenerator::new("No, I do not");
        let applicator = AutoApplicator::new(&profile, &[], Some(&llm), settings());
        let page = doc(
            r#"<p>Do you require sponsorship?</p>
               <input type="radio" name="sponsor" value="1" id="s1" required><label for="s1">Yes</label>
               <input type="radio" name="sponsor" value="0" id="s0" required><label for="s0">No</label>
               <button>Next</button>"#,
        );

        let plan = applicator.run(page, 1).await.unwrap();

        assert!(plan.actions.contains(&FillAction::CheckRadio { index: 1 }));
        assert_eq!(plan.answers[0].answer, "No");
        assert_eq!(plan.answers[0].source, AnswerSource::Llm);
        assert_eq!(plan.navigation, Navigation::Next);
        assert!(llm.calls()[0].1.contains("Available options: Yes, No"));
    }

    #[tokio::test]
    async fn test_radio_checks_the_option_that_was_answered() {
        let profile = Profile::new();
        let llm = StubGenerator::new("No");
        let applicator = AutoApplicator::new(&profile, &[], Some(&llm), settings());
        let page = doc(
            r#"<input type="radio" name="ack" value="a" id="ra" required><label for="ra">Yes, I acknowledge</label>
               <input type="radio" name="ack" value="b" id="rb" required><label for="rb">No</label>"#,
        );

        let plan = applicator.run(page, 0).await.unwrap();

        assert_eq!(plan.answers[0].answer, "No");
        assert!(plan.actions.contains(&FillAction::CheckRadio { index: 1 }));
        assert!(!plan.actions.contains(&FillAction::CheckRadio { index: 0 }));
    }

    #[tokio::test]
    async fn test_basic_fields_claim_distinct_controls() {
        let profile: Profile = [("firstName", "Ada"), ("fullName", "Ada Lovelace")]
            .into_iter()
            .collect();
        let applicator = AutoApplicator::new(&profile, &[], None, settings());
        let page = doc(r#"<input name="first_name"><input name="full_name">"#);

        let plan = applicator.run(page, 0).await.unwrap();

        assert!(plan.actions.contains(&FillAction::SetValue {
            index: 0,
            value: "Ada".into()
        }));
        assert!(plan.actions.contains(&FillAction::SetValue {
            index: 1,
            value: "Ada Lovelace".into()
        }));
    }

    #[test]
    fn test_checkbox_in_wanted_state_is_unchanged() {
        let page = doc(r#"<label><input type="checkbox" name="pp" checked>Subscribe</label>"#);
        let checkbox = &page.controls[0];
        assert!(matches!(plan_fill(&page, checkbox, "Yes"), Fill::Unchanged));
        assert!(matches!(
            plan_fill(&page, checkbox, "No"),
            Fill::Applied(FillAction::SetChecked { index: 0, checked: false })
        ));
    }

    #[test]
    fn test_blank_value_never_fills() {
        let page = doc(r#"<input name="city">"#);
        assert!(matches!(plan_fill(&page, &page.controls[0], "  "), Fill::NoMatch));
    }

    #[tokio::test]
    async fn test_auto_submit_off() {
        let profile = profile();
        let llm = StubGenerator::new("Because.");
        let settings = EngineSettings {
            auto_submit: false,
            ..settings()
        };
        let applicator = AutoApplicator::new(&profile, &[], Some(&llm), settings);

        let plan = applicator.run(doc(PAGE), 0).await.unwrap();

        assert_eq!(plan.navigation, Navigation::Disabled);
        assert!(!plan
            .actions
            .iter()
            .any(|a| matches!(a, FillAction::Click { .. } | FillAction::UploadFile { .. })));
    }

    #[tokio::test]
    async fn test_step_limit() {
        let profile = Profile::new();
        let applicator = AutoApplicator::new(&profile, &[], None, settings());
        let err = applicator.run(doc("<form></form>"), 10).await.unwrap_err();
        assert_eq!(err, EngineError::StepLimit { step: 10, max: 10 });
        assert_eq!(err.to_string(), "Maximum steps (10) reached");
    }

    #[tokio::test]
    async fn test_malformed_resume_is_not_uploaded() {
        let profile = Profile::new();
        let mut resumes = resumes();
        resumes[0].file = "not a data uri".to_string();
        let applicator = AutoApplicator::new(&profile, &resumes, None, settings());

        let plan = applicator
            .run(doc(r#"<input type="file" name="cv">"#), 0)
            .await
            .unwrap();

        assert!(!plan
            .actions
            .iter()
            .any(|a| matches!(a, FillAction::UploadFile { .. })));
    }

    #[tokio::test]
    async fn test_probe_asks_fixed_question() {
        let llm = StubGenerator::new("A pet.");
        probe_llm(&llm).await;
        assert_eq!(llm.calls(), vec![(PROBE_QUESTION.to_string(), String::new())]);
    }
}
