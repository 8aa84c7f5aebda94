//! Document addressing for the remote store.
//!
//! Every entity type lives in exactly one document, its partition:
//! - singletons at `<collection>/main` (the record itself)
//! - lists at `<collection>/list`, wrapped as `{ "items": [...] }`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Field that holds the ordered entries of a list partition.
pub const ITEMS_FIELD: &str = "items";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DocumentPathError {
    #[error("Invalid document path '{0}': expected <collection>/<document>")]
    InvalidFormat(String),

    #[error("Invalid path segment: {0:?}")]
    InvalidSegment(String),
}

/// Location of a single document: a collection name plus a document key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    collection: String,
    document: String,
}

impl DocumentPath {
    pub fn new(
        collection: impl Into<String>,
        document: impl Into<String>,
    ) -> Result<Self, DocumentPathError> {
        let collection = collection.into();
        let document = document.into();
        validate_segment(&collection)?;
        validate_segment(&document)?;
        Ok(Self {
            collection,
            document,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn document(&self) -> &str {
        &self.document
    }
}

/// Rejects empty segments and anything that could escape a directory.
pub fn validate_segment(segment: &str) -> Result<(), DocumentPathError> {
    if segment.is_empty()
        || segment.contains('/')
        || segment.contains('\\')
        || segment.contains("..")
        || segment.starts_with('.')
    {
        return Err(DocumentPathError::InvalidSegment(segment.to_string()));
    }
    Ok(())
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.document)
    }
}

impl FromStr for DocumentPath {
    type Err = DocumentPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((collection, document)) => Self::new(collection, document),
            None => Err(DocumentPathError::InvalidFormat(s.to_string())),
        }
    }
}

/// The fixed set of documents mirrored by the sync layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Partition {
    Profile,
    ResearchInterests,
    TeachingInterests,
    Experiences,
    Publications,
    BookChapters,
    Talks,
    Activities,
    Conferences,
    Lab,
    Awards,
    FinancialSupports,
}

impl Partition {
    pub const ALL: [Partition; 12] = [
        Partition::Profile,
        Partition::ResearchInterests,
        Partition::TeachingInterests,
        Partition::Experiences,
        Partition::Publications,
        Partition::BookChapters,
        Partition::Talks,
        Partition::Activities,
        Partition::Conferences,
        Partition::Lab,
        Partition::Awards,
        Partition::FinancialSupports,
    ];

    /// Returns the collection name this partition is stored under.
    pub fn collection(&self) -> &'static str {
        match self {
            Partition::Profile => "profile",
            Partition::ResearchInterests => "researchInterests",
            Partition::TeachingInterests => "teachingInterests",
            Partition::Experiences => "experiences",
            Partition::Publications => "publications",
            Partition::BookChapters => "bookChapters",
            Partition::Talks => "talks",
            Partition::Activities => "activities",
            Partition::Conferences => "conferences",
            Partition::Lab => "lab",
            Partition::Awards => "awards",
            Partition::FinancialSupports => "financialSupports",
        }
    }

    /// Returns the document key within the collection.
    pub fn document(&self) -> &'static str {
        if self.is_list() {
            "list"
        } else {
            "main"
        }
    }

    pub fn is_list(&self) -> bool {
        !matches!(self, Partition::Profile | Partition::Lab)
    }

    pub fn path(&self) -> DocumentPath {
        DocumentPath {
            collection: self.collection().to_string(),
            document: self.document().to_string(),
        }
    }

    /// Parse from a collection name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.collection().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_paths() {
        assert_eq!(Partition::Profile.path().to_string(), "profile/main");
        assert_eq!(Partition::Lab.path().to_string(), "lab/main");
        assert_eq!(
            Partition::ResearchInterests.path().to_string(),
            "researchInterests/list"
        );
        assert_eq!(
            Partition::FinancialSupports.path().to_string(),
            "financialSupports/list"
        );
    }

    #[test]
    fn test_only_profile_and_lab_are_singletons() {
        let singletons: Vec<_> = Partition::ALL.into_iter().filter(|p| !p.is_list()).collect();
        assert_eq!(singletons, vec![Partition::Profile, Partition::Lab]);
    }

    #[test]
    fn test_partition_parse() {
        assert_eq!(Partition::parse("awards"), Some(Partition::Awards));
        assert_eq!(Partition::parse("BOOKCHAPTERS"), Some(Partition::BookChapters));
        assert_eq!(Partition::parse("unknown"), None);
    }

    #[test]
    fn test_document_path_from_str() {
        let path: DocumentPath = "talks/list".parse().unwrap();
        assert_eq!(path.collection(), "talks");
        assert_eq!(path.document(), "list");
        assert_eq!(path, Partition::Talks.path());
    }

    #[test]
    fn test_document_path_rejects_traversal() {
        assert!(matches!(
            "talks".parse::<DocumentPath>(),
            Err(DocumentPathError::InvalidFormat(_))
        ));
        assert!(matches!(
            "../etc/passwd".parse::<DocumentPath>(),
            Err(DocumentPathError::InvalidSegment(_))
        ));
        assert!(DocumentPath::new("talks", "").is_err());
        assert!(DocumentPath::new(".hidden", "main").is_err());
    }
}
