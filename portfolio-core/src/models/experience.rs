use serde::{Deserialize, Serialize};
use std::fmt;

/// A position held, e.g. an administrative or industry role.
///
/// Dates are free-form strings as entered by the editor ("2022", "Jan 2019").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "startdate")]
    pub start_date: String,
    #[serde(rename = "enddate", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Experience {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        start_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            location: None,
            start_date: start_date.into(),
            end_date: None,
            description: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} ({} - {})",
            self.title,
            self.company,
            self.start_date,
            self.end_date.as_deref().unwrap_or("present")
        )?;
        if let Some(location) = &self.location {
            write!(f, ", {}", location)?;
        }
        Ok(())
    }
}
