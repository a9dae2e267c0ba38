use std::collections::HashMap;

/// Dense, zero-based key assigned in first-seen order by [`ContigIdRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ContigKey(u32);

impl ContigKey {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ContigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    #[error("contig registry is locked, cannot intern new name {0:?}")]
    Locked(String),
    #[error("unknown contig key {0}")]
    UnknownKey(ContigKey),
}

/// Bidirectional intern of textual contig names to dense numeric keys.
///
/// Names map to keys in first-seen order. Once [`lock`](Self::lock) is
/// called, interning an unseen name fails instead of allocating one —
/// this is how path parsing in FASTA mode surfaces an unknown-contig
/// reference.
#[derive(Debug, Default)]
pub struct ContigIdRegistry {
    by_name: HashMap<String, ContigKey>,
    names: Vec<String>,
    locked: bool,
}

impl ContigIdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: &str) -> Result<ContigKey, RegistryError> {
        if let Some(&key) = self.by_name.get(name) {
            return Ok(key);
        }
        if self.locked {
            return Err(RegistryError::Locked(name.to_owned()));
        }

        let key = ContigKey(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.by_name.insert(name.to_owned(), key);
        Ok(key)
    }

    pub fn name(&self, key: ContigKey) -> Result<&str, RegistryError> {
        self.names
            .get(key.index())
            .map(String::as_str)
            .ok_or(RegistryError::UnknownKey(key))
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All interned names in key order (key `n` is `names()[n]`).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Test-only constructors so other modules' unit tests can build
/// [`ContigKey`] values directly instead of always going through a
/// registry.
#[cfg(test)]
pub mod test_support {
    use super::ContigKey;

    pub fn key(n: u32) -> ContigKey {
        ContigKey(n)
    }

    pub fn index(key: ContigKey) -> u32 {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interns_in_first_seen_order() {
        let mut reg = ContigIdRegistry::new();
        let a = reg.intern("a").unwrap();
        let b = reg.intern("b").unwrap();
        let a_again = reg.intern("a").unwrap();

        assert_eq!(a, a_again);
        assert_ne!(a, b);
        assert_eq!(reg.name(a).unwrap(), "a");
        assert_eq!(reg.name(b).unwrap(), "b");
    }

    #[test]
    fn lock_rejects_new_names_but_not_known_ones() {
        let mut reg = ContigIdRegistry::new();
        let a = reg.intern("a").unwrap();
        reg.lock();

        assert_eq!(reg.intern("a").unwrap(), a);
        assert!(matches!(reg.intern("z"), Err(RegistryError::Locked(name)) if name == "z"));
    }

    #[test]
    fn unknown_key_is_total_failure() {
        let reg = ContigIdRegistry::new();
        let bogus = ContigIdRegistry::new().intern("x").unwrap();
        let _ = bogus;
        assert!(reg.name(ContigKey(0)).is_err());
    }
}
