//! Sorted, deduplicated set of every tag the vault has seen.
//!
//! Tags are only ever added. A tag stays listed after the last note carrying
//! it drops it.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    tags: Vec<String>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `tag` if absent. Returns `true` if it was new.
    pub fn register(&mut self, tag: &str) -> bool {
        match self.tags.binary_search_by(|t| t.as_str().cmp(tag)) {
            Ok(_) => false,
            Err(pos) => {
                self.tags.insert(pos, tag.to_string());
                true
            }
        }
    }

    /// Register every tag in `tags`. Returns how many were new.
    pub fn extend<'a>(&mut self, tags: impl IntoIterator<Item = &'a String>) -> usize {
        tags.into_iter().filter(|t| self.register(t)).count()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.binary_search_by(|t| t.as_str().cmp(tag)).is_ok()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.tags.clone()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
