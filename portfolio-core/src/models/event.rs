use serde::{Deserialize, Serialize};
use std::fmt;

/// An invited talk or seminar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Talk {
    pub title: String,
    pub venue: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Talk {
    pub fn new(title: impl Into<String>, venue: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            venue: venue.into(),
            date: date.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Display for Talk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}, {}", self.title, self.venue, self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conference {
    pub title: String,
    pub venue: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Conference {
    pub fn new(title: impl Into<String>, venue: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            venue: venue.into(),
            date: date.into(),
            role: None,
            description: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}, {}", self.title, self.venue, self.date)?;
        if let Some(role) = &self.role {
            write!(f, " ({})", role)?;
        }
        Ok(())
    }
}

/// Professional service or outreach activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub title: String,
    pub organization: String,
    pub description: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl Activity {
    pub fn new(
        title: impl Into<String>,
        organization: impl Into<String>,
        description: impl Into<String>,
        start_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            organization: organization.into(),
            description: description.into(),
            start_date: start_date.into(),
            end_date: None,
        }
    }

    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} ({} - {})",
            self.title,
            self.organization,
            self.start_date,
            self.end_date.as_deref().unwrap_or("present")
        )
    }
}
