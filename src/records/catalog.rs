use super::CollectionKind;

/// Answers which kind a collection ID belongs to.
pub trait CollectionClassifier {
    fn classify(&self, id: &str) -> CollectionKind;

    /// Every currently known collection ID of `kind`.
    fn ids_of_kind(&self, kind: CollectionKind) -> Vec<&str>;

    /// Whether `id` names any known collection.
    fn contains(&self, id: &str) -> bool {
        self.ids_of_kind(self.classify(id)).contains(&id)
    }
}

/// Snapshot of the collection IDs known at the start of an operation.
///
/// Built from one read of the meta lists and one directory listing, then
/// consulted for every classification the operation needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    sections: Vec<String>,
    exhibits: Vec<String>,
    others: Vec<String>,
}

impl Catalog {
    #[must_use]
    pub fn new(sections: Vec<String>, exhibits: Vec<String>, others: Vec<String>) -> Self {
        Self {
            sections,
            exhibits,
            others,
        }
    }
}

impl CollectionClassifier for Catalog {
    fn classify(&self, id: &str) -> CollectionKind {
        if self.sections.iter().any(|s| s == id) {
            CollectionKind::Section
        } else if self.exhibits.iter().any(|e| e == id) {
            CollectionKind::Exhibit
        } else {
            CollectionKind::Unrecognized
        }
    }

    fn ids_of_kind(&self, kind: CollectionKind) -> Vec<&str> {
        let ids = match kind {
            CollectionKind::Section => &self.sections,
            CollectionKind::Exhibit => &self.exhibits,
            CollectionKind::Unrecognized => &self.others,
        };
        ids.iter().map(String::as_str).collect()
    }
}
