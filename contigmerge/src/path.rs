use std::collections::BTreeMap;

use crate::registry::ContigKey;

/// A contig reference with its reading direction (spec §3). Reversing a
/// whole path means reversing the sequence *and* toggling every flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct OrientedContig {
    pub id: ContigKey,
    pub reverse: bool,
}

/// An ordered, non-empty sequence of [`OrientedContig`]s anchored at a
/// root: element 0 always has `reverse = false`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Path {
    elements: Vec<OrientedContig>,
}

impl Path {
    /// Panics if `elements` is empty or its root element is reversed —
    /// both violate the path invariants in spec §3 and indicate a bug
    /// in the caller, not a malformed input.
    pub fn new(elements: Vec<OrientedContig>) -> Self {
        assert!(!elements.is_empty(), "a path must have at least one element");
        assert!(!elements[0].reverse, "a path's root must not be reversed");
        Self { elements }
    }

    pub fn root(&self) -> ContigKey {
        self.elements[0].id
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn as_slice(&self) -> &[OrientedContig] {
        &self.elements
    }

    pub fn reverse_complement(&self) -> Path {
        let elements = self
            .elements
            .iter()
            .rev()
            .map(|e| OrientedContig { id: e.id, reverse: !e.reverse })
            .collect();
        Path { elements }
    }

    /// Grows the path by `head` in front, keeping the root in place.
    pub fn prepend(&mut self, mut head: Vec<OrientedContig>) {
        if head.is_empty() {
            return;
        }
        head.append(&mut self.elements);
        self.elements = head;
    }

    /// Grows the path by `tail` at the end.
    pub fn append(&mut self, mut tail: Vec<OrientedContig>) {
        self.elements.append(&mut tail);
    }
}

/// In-memory mapping from root-contig key to its current canonical
/// path. Iteration is sorted by key so output is reproducible
/// regardless of hash-table nondeterminism elsewhere (spec §4.3, §5).
#[derive(Debug, Default)]
pub struct PathStore {
    paths: BTreeMap<ContigKey, Path>,
}

impl PathStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: ContigKey) -> Option<&Path> {
        self.paths.get(&key)
    }

    pub fn get_mut(&mut self, key: ContigKey) -> Option<&mut Path> {
        self.paths.get_mut(&key)
    }

    pub fn insert(&mut self, key: ContigKey, path: Path) {
        self.paths.insert(key, path);
    }

    /// Releases the stored path under `key`, if any. Safe to call more
    /// than once — a second call is simply a no-op, which is how Phase
    /// 2 dedupe avoids double-freeing an entry reached through two
    /// aliasing keys (spec §5).
    pub fn erase(&mut self, key: ContigKey) -> Option<Path> {
        self.paths.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = ContigKey> + '_ {
        self.paths.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContigKey, &Path)> {
        self.paths.iter().map(|(&k, p)| (k, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oc(id: u32, reverse: bool) -> OrientedContig {
        OrientedContig { id: crate::registry::test_support::key(id), reverse }
    }

    #[test]
    fn reverse_complement_is_involutive() {
        let path = Path::new(vec![oc(0, false), oc(1, true), oc(2, false)]);
        let twice = path.reverse_complement().reverse_complement();
        assert_eq!(path, twice);
    }

    #[test]
    fn reverse_complement_reverses_order_and_flips_flags() {
        let path = Path::new(vec![oc(0, false), oc(1, false), oc(2, true)]);
        let rc = path.reverse_complement();
        assert_eq!(
            rc.as_slice(),
            &[oc(2, false), oc(1, true), oc(0, true)]
        );
    }

    #[test]
    fn prepend_and_append_keep_root_fixed() {
        let mut path = Path::new(vec![oc(0, false)]);
        path.prepend(vec![oc(3, false), oc(4, true)]);
        path.append(vec![oc(5, false)]);
        assert_eq!(path.root(), crate::registry::test_support::key(0));
        assert_eq!(
            path.as_slice(),
            &[oc(3, false), oc(4, true), oc(0, false), oc(5, false)]
        );
    }

    #[test]
    #[should_panic]
    fn new_rejects_reversed_root() {
        Path::new(vec![oc(0, true)]);
    }

    #[test]
    fn store_iteration_is_sorted_by_key() {
        let mut store = PathStore::new();
        for id in [3, 1, 2] {
            store.insert(crate::registry::test_support::key(id), Path::new(vec![oc(id, false)]));
        }
        let seen: Vec<u32> = store.iter().map(|(k, _)| crate::registry::test_support::index(k)).collect();
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn erase_is_idempotent() {
        let mut store = PathStore::new();
        let k = crate::registry::test_support::key(0);
        store.insert(k, Path::new(vec![oc(0, false)]));
        assert!(store.erase(k).is_some());
        assert!(store.erase(k).is_none());
    }
}
