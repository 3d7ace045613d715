use crate::models::StoredResume;

const ROLE_KEYWORDS: &[&str] = &[
    "software",
    "engineer",
    "developer",
    "data",
    "science",
    "design",
    "marketing",
    "sales",
];

fn score(description: &str, resume: &StoredResume) -> usize {
    let name = resume.name.to_lowercase();
    ROLE_KEYWORDS
        .iter()
        .filter(|k| description.contains(*k) || name.contains(*k))
        .count()
}

/// Resume with the strictly highest keyword score; ties and zero scores go to the first.
pub fn select_resume<'a>(job_description: &str, resumes: &'a [StoredResume]) -> Option<&'a StoredResume> {
    let description = job_description.to_lowercase();
    let mut best: Option<(&StoredResume, usize)> = None;

    for resume in resumes {
        let s = score(&description, resume);
        if s > best.map_or(0, |(_, b)| b) {
            best = Some((resume, s));
        }
    }

    best.map(|(r, _)| r).or_else(|| resumes.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn resume(name: &str) -> StoredResume {
        StoredResume {
            name: name.to_string(),
            file: "data:application/pdf;base64,JVBERi0=".to_string(),
            mime_type: "application/pdf".to_string(),
            size: 5,
            upload_date: Utc::now(),
        }
    }

    #[test]
    fn test_no_resumes() {
        assert!(select_resume("Software engineer", &[]).is_none());
    }

    #[test]
    fn test_name_keywords_break_description_ties() {
        let resumes = vec![resume("General"), resume("Data Science CV")];
        let picked = select_resume("We need a software engineer", &resumes).unwrap();
        assert_eq!(picked.name, "Data Science CV");
    }

    #[test]
    fn test_equal_scores_keep_the_earlier_resume() {
        let resumes = vec![resume("Marketing"), resume("Sales")];
        let picked = select_resume("Marketing and sales lead", &resumes).unwrap();
        assert_eq!(picked.name, "Marketing");
    }

    #[test]
    fn test_zero_scores_fall_back_to_first() {
        let resumes = vec![resume("A"), resume("B")];
        assert_eq!(select_resume("Chef wanted", &resumes).unwrap().name, "A");
    }
}
