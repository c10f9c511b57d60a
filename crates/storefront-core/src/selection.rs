use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::ProductOption;

/// The shopper's in-progress choice of option values.
///
/// A selection may be partial. It is owned by a single product view and is
/// replaced, never shared, on every option change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeMap<String, String>);

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `option_name` set to `value`, all other entries kept.
    ///
    /// No availability check is made here; applying the same change twice
    /// yields the same selection.
    #[must_use]
    pub fn with_option(&self, option_name: &str, value: &str) -> Self {
        let mut next = self.0.clone();
        next.insert(option_name.to_owned(), value.to_owned());
        Self(next)
    }

    #[must_use]
    pub fn get(&self, option_name: &str) -> Option<&str> {
        self.0.get(option_name).map(String::as_str)
    }

    #[must_use]
    pub fn is_selected(&self, option_name: &str, value: &str) -> bool {
        self.get(option_name) == Some(value)
    }

    /// `true` when every option the product defines has a chosen value.
    #[must_use]
    pub fn is_complete(&self, options: &[ProductOption]) -> bool {
        options.iter().all(|o| self.0.contains_key(&o.name))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl<K, V> FromIterator<(K, V)> for Selection
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<ProductOption> {
        vec![
            ProductOption {
                name: "Color".to_string(),
                values: vec!["Beige".to_string(), "Gray".to_string()],
                swatches: BTreeMap::new(),
            },
            ProductOption {
                name: "Size".to_string(),
                values: vec!["Small".to_string(), "Large".to_string()],
                swatches: BTreeMap::new(),
            },
        ]
    }

    #[test]
    fn with_option_keeps_other_entries() {
        let selection = Selection::new()
            .with_option("Color", "Beige")
            .with_option("Size", "Small")
            .with_option("Color", "Gray");
        assert_eq!(selection.get("Color"), Some("Gray"));
        assert_eq!(selection.get("Size"), Some("Small"));
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn with_option_is_idempotent() {
        let base = Selection::new().with_option("Color", "Beige");
        let once = base.with_option("Size", "Large");
        let twice = once.with_option("Size", "Large");
        assert_eq!(once, twice);
    }

    #[test]
    fn with_option_does_not_mutate_original() {
        let base = Selection::new();
        let _ = base.with_option("Color", "Beige");
        assert!(base.is_empty());
    }

    #[test]
    fn is_complete_requires_every_option() {
        let partial = Selection::new().with_option("Color", "Beige");
        assert!(!partial.is_complete(&options()));
        let complete = partial.with_option("Size", "Small");
        assert!(complete.is_complete(&options()));
    }

    #[test]
    fn empty_selection_is_complete_for_optionless_product() {
        assert!(Selection::new().is_complete(&[]));
    }

    #[test]
    fn collects_from_pairs() {
        let selection: Selection = [("Color", "Beige"), ("Size", "Small")].into_iter().collect();
        assert!(selection.is_selected("Size", "Small"));
        assert!(!selection.is_selected("Size", "Large"));
    }
}
