use serde::{Deserialize, Serialize};
use std::fmt;

/// The site owner's profile, stored as a single document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub university: String,
    pub education: String,
    pub image_url: String,
    pub phone: String,
    pub email: String,
    pub website_url: String,
    pub about: String,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;

        for (label, value) in [
            ("Title", &self.title),
            ("University", &self.university),
            ("Education", &self.education),
            ("Email", &self.email),
            ("Phone", &self.phone),
            ("Website", &self.website_url),
        ] {
            if !value.is_empty() {
                writeln!(f, "{}: {}", label, value)?;
            }
        }

        if !self.about.is_empty() {
            writeln!(f, "\n{}", self.about)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_reads_camel_case_fields() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "name": "Dr. Jane Doe",
            "university": "NSUT",
            "websiteUrl": "https://example.edu",
            "imageUrl": "https://example.edu/me.jpg"
        }))
        .unwrap();

        assert_eq!(profile.name, "Dr. Jane Doe");
        assert_eq!(profile.website_url, "https://example.edu");
        assert_eq!(profile.image_url, "https://example.edu/me.jpg");
        assert!(profile.about.is_empty());
    }

    #[test]
    fn test_profile_display_skips_empty_fields() {
        let profile = Profile {
            name: "Jane".into(),
            title: "Professor".into(),
            ..Default::default()
        };
        let output = format!("{}", profile);
        assert!(output.contains("Title: Professor"));
        assert!(!output.contains("Phone"));
    }
}
