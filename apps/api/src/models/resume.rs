use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resume as persisted under the `resumes` storage key.
/// The file travels as a `data:` URI, exactly as the options page produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResume {
    pub name: String,
    pub file: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(default)]
    pub size: u64,
    pub upload_date: DateTime<Utc>,
}

/// Listing view of a stored resume; never carries the blob.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub upload_date: DateTime<Utc>,
}

impl From<&StoredResume> for ResumeSummary {
    fn from(resume: &StoredResume) -> Self {
        Self {
            name: resume.name.clone(),
            mime_type: resume.mime_type.clone(),
            size: resume.size,
            upload_date: resume.upload_date,
        }
    }
}

impl StoredResume {
    /// File name offered to the upload control, derived from the resume name and mime type.
    pub fn file_name(&self) -> String {
        let extension = match self.mime_type.as_str() {
            "application/msword" => "doc",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
            _ => "pdf",
        };
        let stem: String = self
            .name
            .trim()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        if stem.is_empty() {
            format!("resume.{extension}")
        } else {
            format!("{stem}.{extension}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resume(name: &str, mime_type: &str) -> StoredResume {
        StoredResume {
            name: name.to_string(),
            file: "data:application/pdf;base64,JVBERi0=".to_string(),
            mime_type: mime_type.to_string(),
            size: 5,
            upload_date: Utc::now(),
        }
    }

    #[test]
    fn test_stored_resume_uses_extension_field_names() {
        let json = r#"{
            "name": "Backend",
            "file": "data:application/pdf;base64,JVBERi0=",
            "type": "application/pdf",
            "size": 5,
            "uploadDate": "2025-03-01T12:00:00Z"
        }"#;
        let parsed: StoredResume = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.mime_type, "application/pdf");
        assert_eq!(parsed.size, 5);

        let value = serde_json::to_value(&parsed).unwrap();
        assert!(value.get("uploadDate").is_some());
        assert!(value.get("type").is_some());
    }

    #[test]
    fn test_file_name_follows_mime_type() {
        assert_eq!(resume("Data Eng", "application/pdf").file_name(), "Data_Eng.pdf");
        assert_eq!(
            resume(
                "cv",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            )
            .file_name(),
            "cv.docx"
        );
        assert_eq!(resume("  ", "application/msword").file_name(), "resume.doc");
    }
}
