pub mod profile;
pub mod resume;

pub use profile::Profile;
pub use resume::{ResumeSummary, StoredResume};
