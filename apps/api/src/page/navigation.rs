//! Submit and next-step button lookup.

use crate::page::document::{ButtonElement, ButtonTag, FormDocument};

// Lowercase; captions are compared case-insensitively.
const SUBMIT_BUTTON_WORDS: &[&str] = &["submit", "apply", "send"];
const SUBMIT_LINK_WORDS: &[&str] = &["submit", "apply"];
const NEXT_BUTTON_WORDS: &[&str] = &["next", "continue", "save"];
const NEXT_LINK_WORDS: &[&str] = &["next", "continue"];

fn visible(doc: &FormDocument) -> impl Iterator<Item = &ButtonElement> {
    doc.buttons.iter().filter(|b| b.visible)
}

fn text_has(button: &ButtonElement, words: &[&str]) -> bool {
    let text = button.text.to_lowercase();
    words.iter().any(|w| text.contains(w))
}

/// Explicit submit controls first, then buttons by caption, then links and
/// `role="button"` elements by caption.
pub fn find_submit_button(doc: &FormDocument) -> Option<&ButtonElement> {
    let typed_submit = |tag: ButtonTag| {
        visible(doc).find(move |b| b.tag == tag && b.button_type.as_deref() == Some("submit"))
    };

    typed_submit(ButtonTag::Button)
        .or_else(|| typed_submit(ButtonTag::Input))
        .or_else(|| {
            visible(doc).find(|b| b.tag == ButtonTag::Button && text_has(b, SUBMIT_BUTTON_WORDS))
        })
        .or_else(|| {
            visible(doc).find(|b| {
                matches!(b.tag, ButtonTag::Link | ButtonTag::RoleButton)
                    && text_has(b, SUBMIT_LINK_WORDS)
            })
        })
}

/// Buttons captioned Next/Continue/Save, then links captioned Next/Continue.
pub fn find_next_button(doc: &FormDocument) -> Option<&ButtonElement> {
    visible(doc)
        .find(|b| b.tag == ButtonTag::Button && text_has(b, NEXT_BUTTON_WORDS))
        .or_else(|| {
            visible(doc).find(|b| b.tag == ButtonTag::Link && text_has(b, NEXT_LINK_WORDS))
        })
}
