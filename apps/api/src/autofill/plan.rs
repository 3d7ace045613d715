use serde::Serialize;

/// One DOM operation for the host to replay, in plan order.
///
/// `index` addresses the `input, select, textarea` list; `button_index` the button list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FillAction {
    Wait {
        millis: u64,
        reason: WaitReason,
    },
    /// Set `.value` on an input or textarea and fire `input` + `change`.
    SetValue { index: usize, value: String },
    /// Set a select's value to an option value and fire `change`.
    SelectOption { index: usize, value: String },
    CheckRadio { index: usize },
    SetChecked { index: usize, checked: bool },
    UploadFile {
        index: usize,
        file_name: String,
        mime_type: String,
        data_uri: String,
    },
    Click {
        button_index: usize,
        target: ClickTarget,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitReason {
    /// Wait for `load`, bounded by `millis`.
    PageLoad,
    UploadSettle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    Submit,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Hardcoded,
    Demographic,
    Profile,
    Llm,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnsweredField {
    pub index: usize,
    pub question: String,
    pub answer: String,
    pub source: AnswerSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnfilledField {
    pub index: usize,
    pub question: String,
}

/// How the pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
    Submit,
    Next,
    /// Required fields are still empty; nothing is clicked.
    AwaitingInput,
    /// Auto-submit is turned off.
    Disabled,
    NoButton,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillPlan {
    pub step: u32,
    pub actions: Vec<FillAction>,
    pub answers: Vec<AnsweredField>,
    pub unfilled_required: Vec<UnfilledField>,
    pub navigation: Navigation,
}

impl FillPlan {
    pub fn new(step: u32) -> Self {
        Self {
            step,
            actions: Vec::new(),
            answers: Vec::new(),
            unfilled_required: Vec::new(),
            navigation: Navigation::NoButton,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_are_tagged_by_kind() {
        let value = serde_json::to_value(FillAction::SetChecked {
            index: 4,
            checked: true,
        })
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({"kind": "set_checked", "index": 4, "checked": true})
        );

        let value = serde_json::to_value(FillAction::Wait {
            millis: 3000,
            reason: WaitReason::UploadSettle,
        })
        .unwrap();
        assert_eq!(value["kind"], "wait");
        assert_eq!(value["reason"], "upload_settle");
    }

    #[test]
    fn test_click_serialization() {
        let value = serde_json::to_value(FillAction::Click {
            button_index: 2,
            target: ClickTarget::Submit,
        })
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({"kind": "click", "button_index": 2, "target": "submit"})
        );
    }
}
