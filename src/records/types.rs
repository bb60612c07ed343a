use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a primary collection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// A gallery section, listed in the sections meta collection
    Section,
    /// An exhibition, listed in the exhibitions meta collection
    Exhibit,
    /// Any other collection (e.g. the photo gallery of a single work)
    Unrecognized,
}

impl CollectionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Exhibit => "exhibit",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl std::str::FromStr for CollectionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "section" => Ok(Self::Section),
            "exhibit" | "exhibition" => Ok(Self::Exhibit),
            "unrecognized" | "other" => Ok(Self::Unrecognized),
            _ => Err(format!("Invalid collection kind: {s}")),
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A primary collection as stored in `collections/<id>.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDocument {
    pub kind: CollectionKind,
    /// Items in storage order; new items are prepended
    #[serde(default)]
    pub items: Vec<Value>,
    pub updated_at: String,
}

/// Result of registering a new collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCollection {
    pub id: String,
    pub kind: CollectionKind,
    /// Storage length of the meta list after the new ID was prepended,
    /// `None` for unrecognized collections
    pub meta_length: Option<usize>,
}

/// Result of removing a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedCollection {
    pub id: String,
    pub kind: CollectionKind,
    /// Former position of the ID in its meta list and the list's new length
    pub meta_position: Option<(usize, usize)>,
}

/// Result of removing an item from a collection
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedItem {
    pub item: Value,
    /// Storage length after the removal
    pub length: usize,
}
