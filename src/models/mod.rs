use std::collections::BTreeSet;

pub mod constraints;
pub mod garment;
pub mod outfit;
pub mod weather;

pub use constraints::{ConstraintSet, OutfitFilters, PoolNarrowing};
pub use garment::{Garment, RawGarmentRecord, Slot};
pub use outfit::OutfitCandidate;
pub use weather::{ForecastPoint, Location, Recommendation, WeatherSnapshot};

/// Set of free-text labels (colors, styles, seasons, occasions)
///
/// Labels keep the casing they arrived with. Every comparison goes through
/// [`label_eq`], so "Blue" and "blue" are the same label for matching.
pub type LabelSet = BTreeSet<String>;

/// Trims a raw label, returning `None` when nothing is left
pub fn clean_label(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Builds a label set from raw strings, dropping blanks
pub fn label_set<I, S>(labels: I) -> LabelSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .filter_map(|label| clean_label(label.as_ref()))
        .collect()
}

/// Splits a comma-joined label ("Blue, White") into its parts
pub fn split_labels(raw: &str) -> LabelSet {
    label_set(raw.split(','))
}

/// Case-insensitive label equality
pub fn label_eq(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Returns true when `set` contains `label`, ignoring case
pub fn contains_label(set: &LabelSet, label: &str) -> bool {
    set.iter().any(|candidate| label_eq(candidate, label))
}

/// Returns true when the two sets share at least one label
pub fn overlaps(a: &LabelSet, b: &LabelSet) -> bool {
    a.iter().any(|label| contains_label(b, label))
}

/// Collects labels into a set, keeping the first spelling of each label
pub fn union_labels<'a, I>(labels: I) -> LabelSet
where
    I: IntoIterator<Item = &'a str>,
{
    let mut union = LabelSet::new();
    for label in labels {
        if !contains_label(&union, label) {
            union.insert(label.to_string());
        }
    }
    union
}

/// Number of labels in `wanted` that also appear in `have`
pub fn overlap_count(wanted: &LabelSet, have: &LabelSet) -> usize {
    wanted
        .iter()
        .filter(|label| contains_label(have, label))
        .count()
}
