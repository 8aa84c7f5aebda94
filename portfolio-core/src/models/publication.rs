use serde::{Deserialize, Serialize};
use std::fmt;

/// A journal or conference paper. `journal` holds the publication venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    pub authors: String,
    pub journal: String,
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Publication {
    pub fn new(
        title: impl Into<String>,
        authors: impl Into<String>,
        journal: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            authors: authors.into(),
            journal: journal.into(),
            year: year.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl fmt::Display for Publication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. \"{}\". {}, {}",
            self.authors, self.title, self.journal, self.year
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookChapter {
    pub title: String,
    pub authors: String,
    pub book_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editors: Option<String>,
    pub publisher: String,
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl BookChapter {
    pub fn new(
        title: impl Into<String>,
        authors: impl Into<String>,
        book_title: impl Into<String>,
        publisher: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            authors: authors.into(),
            book_title: book_title.into(),
            editors: None,
            publisher: publisher.into(),
            year: year.into(),
            pages: None,
            url: None,
        }
    }

    pub fn with_editors(mut self, editors: impl Into<String>) -> Self {
        self.editors = Some(editors.into());
        self
    }

    pub fn with_pages(mut self, pages: impl Into<String>) -> Self {
        self.pages = Some(pages.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl fmt::Display for BookChapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. \"{}\". In {}", self.authors, self.title, self.book_title)?;
        if let Some(editors) = &self.editors {
            write!(f, " (eds. {})", editors)?;
        }
        write!(f, ", {}, {}", self.publisher, self.year)?;
        if let Some(pages) = &self.pages {
            write!(f, ", pp. {}", pages)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_chapter_camel_case() {
        let chapter = BookChapter::new("Ch 1", "A. Author", "Handbook", "Springer", "2020")
            .with_pages("1-20");
        let value = serde_json::to_value(&chapter).unwrap();
        assert_eq!(value["bookTitle"], "Handbook");
        assert_eq!(value["pages"], "1-20");
        assert!(value.get("editors").is_none());
    }

    #[test]
    fn test_publication_missing_url_is_none() {
        let publication: Publication = serde_json::from_value(serde_json::json!({
            "title": "Deep ECG",
            "authors": "S. Author",
            "journal": "IEEE TBME",
            "year": "2022"
        }))
        .unwrap();
        assert!(publication.url.is_none());
        assert_eq!(
            format!("{}", publication),
            "S. Author. \"Deep ECG\". IEEE TBME, 2022"
        );
    }
}
