//! Segment registry: which board segments are in play and their word lists.

use serde::Serialize;

use crate::board::SegmentSpec;

/// Disabling is refused once only this many segments remain enabled.
pub const MIN_ENABLED_SEGMENTS: usize = 2;

/// A board segment and its words.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub name: String,
    pub title: Option<String>,
    pub enabled: bool,
    pub words: Vec<String>,
}

/// Error changing a segment's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentError {
    Unknown(String),
    /// Disabling would leave fewer than [`MIN_ENABLED_SEGMENTS`] enabled
    MinimumEnabled { name: String, enabled: usize },
}

impl std::fmt::Display for SegmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentError::Unknown(name) => write!(f, "Unknown segment \"{}\"", name),
            SegmentError::MinimumEnabled { name, enabled } => write!(
                f,
                "Cannot disable \"{}\": only {} segments enabled, at least {} required",
                name, enabled, MIN_ENABLED_SEGMENTS
            ),
        }
    }
}

impl std::error::Error for SegmentError {}

/// Ordered set of segments, kept in configuration order.
#[derive(Debug, Clone)]
pub struct SegmentRegistry {
    segments: Vec<Segment>,
}

impl SegmentRegistry {
    /// Build a registry with every segment enabled.
    pub fn new(specs: &[SegmentSpec]) -> Self {
        let segments = specs
            .iter()
            .map(|spec| Segment {
                name: spec.name.clone(),
                title: spec.title.clone(),
                enabled: true,
                words: spec.words.clone(),
            })
            .collect();
        Self { segments }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name == name)
    }

    fn position(&self, name: &str) -> Result<usize, SegmentError> {
        self.segments.iter().position(|s| s.name == name).ok_or_else(|| {
            tracing::error!("Unknown segment \"{}\"", name);
            SegmentError::Unknown(name.to_string())
        })
    }

    /// `false` for disabled or unknown segments.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.position(name)
            .map(|i| self.segments[i].enabled)
            .unwrap_or(false)
    }

    pub fn enabled_count(&self) -> usize {
        self.segments.iter().filter(|s| s.enabled).count()
    }

    /// Set a segment's state, returning the new state.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<bool, SegmentError> {
        let index = self.position(name)?;

        if !enabled && self.segments[index].enabled {
            let count = self.enabled_count();
            if count <= MIN_ENABLED_SEGMENTS {
                tracing::warn!(
                    "Refusing to disable segment \"{}\": need at least {} enabled",
                    name,
                    MIN_ENABLED_SEGMENTS
                );
                return Err(SegmentError::MinimumEnabled {
                    name: name.to_string(),
                    enabled: count,
                });
            }
        }

        self.segments[index].enabled = enabled;
        Ok(enabled)
    }

    pub fn toggle(&mut self, name: &str) -> Result<bool, SegmentError> {
        let index = self.position(name)?;
        let enabled = self.segments[index].enabled;
        self.set_enabled(name, !enabled)
    }

    pub fn reset_all(&mut self) {
        for segment in &mut self.segments {
            segment.enabled = true;
        }
    }

    /// Words of all enabled segments, in registry order.
    pub fn word_pool(&self) -> Vec<String> {
        self.segments
            .iter()
            .filter(|s| s.enabled)
            .flat_map(|s| s.words.iter().cloned())
            .collect()
    }

    pub fn segment_has_word(&self, name: &str, word: &str) -> bool {
        self.get(name).is_some_and(|s| s.words.iter().any(|w| w == word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(names: &[&str]) -> SegmentRegistry {
        let specs: Vec<SegmentSpec> = names
            .iter()
            .map(|name| SegmentSpec {
                name: name.to_string(),
                title: None,
                words: vec![format!("{}-1", name), format!("{}-2", name)],
            })
            .collect();
        SegmentRegistry::new(&specs)
    }

    #[test]
    fn test_all_enabled_initially() {
        let reg = registry(&["a", "b", "c"]);
        assert_eq!(reg.enabled_count(), 3);
        assert_eq!(reg.word_pool(), vec!["a-1", "a-2", "b-1", "b-2", "c-1", "c-2"]);
    }

    #[test]
    fn test_double_toggle_restores_state() {
        let mut reg = registry(&["a", "b", "c", "d"]);
        let pool = reg.word_pool();

        assert_eq!(reg.toggle("b"), Ok(false));
        assert!(!reg.is_enabled("b"));
        assert_eq!(reg.word_pool(), vec!["a-1", "a-2", "c-1", "c-2", "d-1", "d-2"]);

        assert_eq!(reg.toggle("b"), Ok(true));
        assert!(reg.is_enabled("b"));
        assert_eq!(reg.word_pool(), pool);
    }

    #[test]
    fn test_cannot_disable_below_minimum() {
        let mut reg = registry(&["a", "b", "c", "d"]);
        assert_eq!(reg.set_enabled("a", false), Ok(false));
        assert_eq!(reg.set_enabled("b", false), Ok(false));
        assert_eq!(reg.enabled_count(), 2);

        assert_eq!(
            reg.toggle("c"),
            Err(SegmentError::MinimumEnabled {
                name: "c".to_string(),
                enabled: 2
            })
        );
        assert_eq!(reg.enabled_count(), 2);
        assert!(reg.is_enabled("c"));

        // Re-enabling is always allowed
        assert_eq!(reg.toggle("a"), Ok(true));
        assert_eq!(reg.enabled_count(), 3);
    }

    #[test]
    fn test_disabling_already_disabled_is_not_blocked() {
        let mut reg = registry(&["a", "b", "c"]);
        reg.set_enabled("a", false).unwrap();
        assert_eq!(reg.set_enabled("a", false), Ok(false));
    }

    #[test]
    fn test_unknown_segment() {
        let mut reg = registry(&["a", "b"]);
        assert_eq!(reg.toggle("zzz"), Err(SegmentError::Unknown("zzz".to_string())));
        assert!(!reg.is_enabled("zzz"));
        assert_eq!(reg.enabled_count(), 2);
    }

    #[test]
    fn test_reset_all() {
        let mut reg = registry(&["a", "b", "c"]);
        reg.toggle("a").unwrap();
        reg.reset_all();
        assert_eq!(reg.enabled_count(), 3);
    }

    #[test]
    fn test_segment_has_word() {
        let reg = registry(&["a", "b"]);
        assert!(reg.segment_has_word("a", "a-2"));
        assert!(!reg.segment_has_word("a", "b-1"));
        assert!(!reg.segment_has_word("missing", "a-1"));
    }
}
