//! Lab information, stored as a single document.
//!
//! Older lab documents predate the `location`, `equipment` and `labHours`
//! fields. [`Lab::with_defaults`] fills them in for display without touching
//! the stored document.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lab {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub research: Vec<String>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LabLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_hours: Option<LabHours>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabLocation {
    pub room: String,
    pub building: String,
    pub university: String,
    pub city: String,
    pub country: String,
}

impl Default for LabLocation {
    fn default() -> Self {
        Self {
            room: "Room 403".to_string(),
            building: "Engineering Building".to_string(),
            university: "Netaji Subhas University Of Technology".to_string(),
            city: "New Delhi".to_string(),
            country: "India".to_string(),
        }
    }
}

impl fmt::Display for LabLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}",
            self.room, self.building, self.university, self.city, self.country
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabHours {
    pub weekdays: String,
    pub weekends: String,
}

impl Default for LabHours {
    fn default() -> Self {
        Self {
            weekdays: "Monday - Friday: 9:00 AM - 6:00 PM".to_string(),
            weekends: "Weekends: By appointment only".to_string(),
        }
    }
}

/// Equipment list shown for labs that have not recorded their own.
pub fn default_equipment() -> Vec<String> {
    [
        "High-performance computing cluster",
        "Medical imaging workstations",
        "Signal acquisition devices",
        "Data analysis software suite",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Lab {
    /// Populates any missing `location`, `equipment` or `lab_hours`.
    pub fn with_defaults(mut self) -> Self {
        if self.location.is_none() {
            self.location = Some(LabLocation::default());
        }
        if self.equipment.is_none() {
            self.equipment = Some(default_equipment());
        }
        if self.lab_hours.is_none() {
            self.lab_hours = Some(LabHours::default());
        }
        self
    }
}

impl fmt::Display for Lab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;

        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
        }
        if let Some(location) = &self.location {
            writeln!(f, "\nLocation: {}", location)?;
        }
        if let Some(hours) = &self.lab_hours {
            writeln!(f, "Hours: {}; {}", hours.weekdays, hours.weekends)?;
        }

        for (heading, values) in [
            ("Research", Some(&self.research)),
            ("Members", Some(&self.members)),
            ("Equipment", self.equipment.as_ref()),
        ] {
            if let Some(values) = values.filter(|v| !v.is_empty()) {
                writeln!(f, "\n{}:", heading)?;
                for value in values {
                    writeln!(f, "  - {}", value)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_defaults_fills_missing_fields() {
        let lab = Lab {
            name: "Biomedical Signal Lab".into(),
            ..Default::default()
        }
        .with_defaults();

        assert_eq!(lab.location, Some(LabLocation::default()));
        assert_eq!(lab.equipment.as_ref().map(Vec::len), Some(4));
        assert_eq!(
            lab.lab_hours.as_ref().map(|h| h.weekends.as_str()),
            Some("Weekends: By appointment only")
        );
    }

    #[test]
    fn test_with_defaults_keeps_existing_values() {
        let location = LabLocation {
            room: "B-12".into(),
            building: "Main".into(),
            university: "NSUT".into(),
            city: "Delhi".into(),
            country: "India".into(),
        };
        let lab = Lab {
            location: Some(location.clone()),
            equipment: Some(vec![]),
            ..Default::default()
        }
        .with_defaults();

        assert_eq!(lab.location, Some(location));
        assert_eq!(lab.equipment, Some(vec![]));
    }

    #[test]
    fn test_lab_missing_sets_default_to_empty() {
        let lab: Lab = serde_json::from_value(serde_json::json!({
            "name": "Lab",
            "description": "desc",
            "labHours": {"weekdays": "9-5", "weekends": "closed"}
        }))
        .unwrap();
        assert!(lab.members.is_empty());
        assert!(lab.research.is_empty());
        assert_eq!(lab.lab_hours.unwrap().weekdays, "9-5");
    }
}
