use std::collections::HashSet;

use uuid::Uuid;

/// Append-only set of movie ids that later tiers must not return.
///
/// Keeps insertion order so the slice can be handed straight to catalog
/// queries, and a hash index so membership stays O(1) as tiers add to it.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    ordered: Vec<Uuid>,
    seen: HashSet<Uuid>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the id was already excluded
    pub fn insert(&mut self, id: Uuid) -> bool {
        if self.seen.insert(id) {
            self.ordered.push(id);
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    pub fn contains(&self, id: &Uuid) -> bool {
        self.seen.contains(id)
    }

    pub fn as_slice(&self) -> &[Uuid] {
        &self.ordered
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl Extend<Uuid> for ExclusionSet {
    fn extend<I: IntoIterator<Item = Uuid>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl FromIterator<Uuid> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
