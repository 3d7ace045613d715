pub mod answers;
pub mod engine;
pub mod handlers;
pub mod option_match;
pub mod plan;
pub mod platform;
pub mod profile_fields;
pub mod prompts;
pub mod resume_select;
