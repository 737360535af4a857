//! Tracking of the names requested on the command line.

/// The set of requested entry names and whether each has been seen.
///
/// An empty selection matches every entry. Each requested name is satisfied
/// by at most one archive entry: the first one with that exact name. Asking
/// for the same name twice therefore needs two entries with that name.
#[derive(Debug, Default)]
pub struct Selection {
    requested: Vec<(String, bool)>,
}

impl Selection {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            requested: names.into_iter().map(|n| (n.into(), false)).collect(),
        }
    }

    /// Decides whether an entry called `name` is selected.
    ///
    /// With a filter in place this flags the first unflagged request for
    /// `name`; once flagged, a request never matches again.
    pub fn mark(&mut self, name: &str) -> bool {
        if self.requested.is_empty() {
            return true;
        }
        match self
            .requested
            .iter_mut()
            .find(|(requested, found)| !*found && requested == name)
        {
            Some((_, found)) => {
                *found = true;
                true
            }
            None => false,
        }
    }

    /// Consumes the selection, returning the requested names that were never
    /// matched, in the order they were requested.
    pub fn finalize(self) -> Vec<String> {
        self.requested
            .into_iter()
            .filter_map(|(name, found)| (!found).then_some(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selects_everything() {
        let mut selection = Selection::default();
        assert!(selection.mark("a"));
        assert!(selection.mark("a"));
        assert!(selection.finalize().is_empty());
    }

    #[test]
    fn first_match_only() {
        let mut selection = Selection::new(["a", "c"]);
        assert!(selection.mark("a"));
        assert!(!selection.mark("a"));
        assert!(!selection.mark("b"));
        assert_eq!(selection.finalize(), vec!["c".to_string()]);
    }

    #[test]
    fn repeated_request_needs_repeated_entries() {
        let mut selection = Selection::new(["a", "a"]);
        assert!(selection.mark("a"));
        assert_eq!(selection.finalize(), vec!["a".to_string()]);

        let mut selection = Selection::new(["a", "a"]);
        assert!(selection.mark("a"));
        assert!(selection.mark("a"));
        assert!(!selection.mark("a"));
        assert!(selection.finalize().is_empty());
    }

    #[test]
    fn exact_comparison() {
        let mut selection = Selection::new(["dir/a"]);
        assert!(!selection.mark("a"));
        assert!(!selection.mark("dir/a/"));
        assert!(!selection.mark("./dir/a"));
        assert!(selection.mark("dir/a"));
    }

    #[test]
    fn missing_names_keep_request_order() {
        let selection = Selection::new(["z", "y", "x"]);
        assert_eq!(selection.finalize(), ["z", "y", "x"]);
    }
}
