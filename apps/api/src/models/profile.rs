use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The applicant's profile: a flat map of form-field names to values, stored verbatim.
///
/// Keys follow the extension's camelCase naming (`firstName`, `zipCode`, `visaStatus`, ...).
/// Empty values are treated as absent by every accessor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(BTreeMap<String, String>);

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the trimmed value for `key`, or `None` when missing or blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }

    /// `fullName`, else `firstName lastName` built from whichever parts exist.
    pub fn display_name(&self) -> Option<String> {
        if let Some(full) = self.get("fullName") {
            return Some(full.to_string());
        }
        let parts: Vec<&str> = [self.get("firstName"), self.get("lastName")]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Profile {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Profile(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_are_absent() {
        let profile: Profile = [("email", "  "), ("phone", "555-0100")].into_iter().collect();
        assert_eq!(profile.get("email"), None);
        assert_eq!(profile.get("phone"), Some("555-0100"));
        assert_eq!(profile.get("city"), None);
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        let profile: Profile = [("fullName", "Ada Lovelace"), ("firstName", "Ada")]
            .into_iter()
            .collect();
        assert_eq!(profile.display_name().as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_display_name_joins_available_parts() {
        let profile: Profile = [("lastName", "Lovelace")].into_iter().collect();
        assert_eq!(profile.display_name().as_deref(), Some("Lovelace"));
        assert_eq!(Profile::new().display_name(), None);
    }

    #[test]
    fn test_profile_serializes_as_flat_map() {
        let json = r#"{"firstName":"Ada","customQuestion":"42"}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.get("customQuestion"), Some("42"));
        assert_eq!(
            serde_json::to_string(&profile).unwrap(),
            r#"{"customQuestion":"42","firstName":"Ada"}"#
        );
    }
}
