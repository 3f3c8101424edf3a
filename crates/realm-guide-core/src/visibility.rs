//! Minimal show/hide deltas between visibility sets

use std::collections::BTreeSet;

/// Names to hide, then names to show. Both sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityDelta {
    pub hide: Vec<String>,
    pub show: Vec<String>,
}

impl VisibilityDelta {
    pub fn is_empty(&self) -> bool {
        self.hide.is_empty() && self.show.is_empty()
    }
}

/// Remembers the last applied set of visible managed names
#[derive(Debug, Default)]
pub struct VisibilityTracker {
    visible: BTreeSet<String>,
}

impl VisibilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from whatever is already visible
    pub fn seeded<I, S>(visible: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            visible: visible.into_iter().map(Into::into).collect(),
        }
    }

    pub fn visible(&self) -> &BTreeSet<String> {
        &self.visible
    }

    /// Record a show or hide made outside of [`apply`](Self::apply)
    pub fn set_visible(&mut self, name: &str, visible: bool) {
        if visible {
            self.visible.insert(name.to_string());
        } else {
            self.visible.remove(name);
        }
    }

    /// Make `names` the visible set; only changed names appear in the delta
    pub fn apply(&mut self, names: &BTreeSet<String>) -> VisibilityDelta {
        let delta = VisibilityDelta {
            hide: self.visible.difference(names).cloned().collect(),
            show: names.difference(&self.visible).cloned().collect(),
        };
        if !delta.is_empty() {
            tracing::debug!(
                "Visibility delta: hide {:?}, show {:?}",
                delta.hide,
                delta.show
            );
        }
        self.visible = names.clone();
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_minimal_delta() {
        let mut tracker = VisibilityTracker::seeded(["table", "path"]);
        let delta = tracker.apply(&set(&["path", "mic", "forest"]));
        assert_eq!(delta.hide, vec!["table"]);
        assert_eq!(delta.show, vec!["forest", "mic"]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut tracker = VisibilityTracker::new();
        let names = set(&["table", "Indicator8"]);
        assert!(!tracker.apply(&names).is_empty());
        assert!(tracker.apply(&names).is_empty());
        assert_eq!(tracker.visible(), &names);
    }

    #[test]
    fn test_external_show_is_hidden_by_next_apply() {
        let mut tracker = VisibilityTracker::seeded(["table"]);
        tracker.set_visible("Indicator14", true);
        let delta = tracker.apply(&set(&["table", "mic"]));
        assert_eq!(delta.hide, vec!["Indicator14"]);
        assert_eq!(delta.show, vec!["mic"]);

        tracker.set_visible("mic", false);
        assert_eq!(tracker.apply(&set(&["table", "mic"])).show, vec!["mic"]);
    }

    #[test]
    fn test_hide_everything() {
        let mut tracker = VisibilityTracker::seeded(["b", "a"]);
        let delta = tracker.apply(&BTreeSet::new());
        assert_eq!(delta.hide, vec!["a", "b"]);
        assert!(delta.show.is_empty());
    }
}
