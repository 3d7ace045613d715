pub mod document;
pub mod navigation;
pub mod selectors;

pub use document::{FormControl, FormDocument};
