//! Unique parameter names within one statement.

use std::collections::{HashMap, HashSet};

/// Hands out parameter names, suffixing repeats: `a`, `a2`, `a3`.
#[derive(Debug, Default)]
pub(crate) struct NameAllocator {
    taken: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl NameAllocator {
    /// Creates an allocator that never returns any of `reserved`.
    pub(crate) fn with_reserved<I, S>(reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            taken: reserved.into_iter().map(Into::into).collect(),
            next_suffix: HashMap::new(),
        }
    }

    pub(crate) fn allocate(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let suffix = self.next_suffix.entry(base.to_string()).or_insert(2);
        loop {
            let candidate = format!("{base}{suffix}");
            *suffix += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes_repeats() {
        let mut names = NameAllocator::default();
        assert_eq!(names.allocate("a"), "a");
        assert_eq!(names.allocate("a"), "a2");
        assert_eq!(names.allocate("a"), "a3");
        assert_eq!(names.allocate("b"), "b");
    }

    #[test]
    fn test_reserved_names_are_skipped() {
        let mut names = NameAllocator::with_reserved(["status", "status2"]);
        assert_eq!(names.allocate("status"), "status3");
    }
}
