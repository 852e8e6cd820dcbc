use std::collections::BTreeSet;

/// Section expanded when the explorer is first shown.
pub const DEFAULT_OPEN_SECTION: &str = "structure";

/// Which top-level sections are expanded. Survives refreshes; only `toggle`
/// changes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionStateStore {
    open: BTreeSet<String>,
}

impl Default for SectionStateStore {
    fn default() -> Self {
        let mut open = BTreeSet::new();
        open.insert(DEFAULT_OPEN_SECTION.to_string());
        Self { open }
    }
}

impl SectionStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one section. Any number of sections may be open at once.
    pub fn toggle(&mut self, section: &str) {
        if !self.open.remove(section) {
            self.open.insert(section.to_string());
        }
    }

    pub fn is_open(&self, section: &str) -> bool {
        self.open.contains(section)
    }

    pub fn open_sections(&self) -> impl Iterator<Item = &str> {
        self.open.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_opens_structure_only() {
        let store = SectionStateStore::new();
        assert!(store.is_open("structure"));
        assert!(!store.is_open("session"));
        assert_eq!(store.open_sections().collect::<Vec<_>>(), vec!["structure"]);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut store = SectionStateStore::new();
        for id in ["structure", "fvgs", "not-in-any-document"] {
            let before = store.is_open(id);
            store.toggle(id);
            assert_ne!(store.is_open(id), before);
            store.toggle(id);
            assert_eq!(store.is_open(id), before);
        }
    }

    #[test]
    fn test_sections_open_independently() {
        let mut store = SectionStateStore::new();
        store.toggle("sweeps");
        store.toggle("levels");
        assert!(store.is_open("structure"));
        assert!(store.is_open("sweeps"));
        assert!(store.is_open("levels"));
        store.toggle("structure");
        assert!(!store.is_open("structure"));
        assert!(store.is_open("sweeps"));
    }
}
