use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{contains_label, overlaps, Garment, LabelSet};

/// Explicit filters supplied by the caller of the generic entry point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutfitFilters {
    pub event_type: Option<String>,
    pub colors: Vec<String>,
    pub style: Option<String>,
    /// Forwarded to the inventory store as a store-level filter
    pub brand: Option<String>,
    pub use_owned_only: bool,
    pub budget: Option<Decimal>,
}

impl Default for OutfitFilters {
    fn default() -> Self {
        Self {
            event_type: None,
            colors: Vec::new(),
            style: None,
            brand: None,
            use_owned_only: true,
            budget: None,
        }
    }
}

/// Second, pool-level narrowing applied by the weather and event entry points
///
/// A garment passes when it matches either dimension of the narrowing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PoolNarrowing {
    SeasonOrStyle { seasons: LabelSet, styles: LabelSet },
    OccasionOrStyle { occasions: LabelSet, styles: LabelSet },
}

impl PoolNarrowing {
    /// Style hints carried by the narrowing
    pub fn styles(&self) -> &LabelSet {
        match self {
            PoolNarrowing::SeasonOrStyle { styles, .. }
            | PoolNarrowing::OccasionOrStyle { styles, .. } => styles,
        }
    }

    pub fn admits(&self, garment: &Garment) -> bool {
        match self {
            PoolNarrowing::SeasonOrStyle { seasons, styles } => {
                open_set_matches(seasons, &garment.seasons) || style_in(styles, garment)
            }
            PoolNarrowing::OccasionOrStyle { occasions, styles } => {
                open_set_matches(occasions, &garment.occasions) || style_in(styles, garment)
            }
        }
    }
}

/// Normalized filtering inputs for one generation call
///
/// Every empty set means "no restriction", never "nothing matches".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstraintSet {
    pub event_type: Option<String>,
    pub allowed_colors: LabelSet,
    pub preferred_styles: LabelSet,
    pub use_owned_only: bool,
    /// Only ever set when `use_owned_only` is false
    pub budget_ceiling: Option<Decimal>,
    pub allowed_seasons: LabelSet,
    pub allowed_occasions: LabelSet,
    pub narrowing: Option<PoolNarrowing>,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self {
            event_type: None,
            allowed_colors: LabelSet::new(),
            preferred_styles: LabelSet::new(),
            use_owned_only: true,
            budget_ceiling: None,
            allowed_seasons: LabelSet::new(),
            allowed_occasions: LabelSet::new(),
            narrowing: None,
        }
    }
}

impl ConstraintSet {
    /// Generic filter: every non-empty dimension must match
    pub fn admits(&self, garment: &Garment) -> bool {
        open_set_matches(&self.allowed_seasons, &garment.seasons)
            && open_set_matches(&self.allowed_occasions, &garment.occasions)
            && (self.allowed_colors.is_empty() || overlaps(&garment.colors, &self.allowed_colors))
            && (self.preferred_styles.is_empty() || style_in(&self.preferred_styles, garment))
            && self.within_budget(garment)
    }

    /// Generic filter followed by the pool-level narrowing, if any
    pub fn admits_with_narrowing(&self, garment: &Garment) -> bool {
        self.admits(garment)
            && self
                .narrowing
                .as_ref()
                .map_or(true, |narrowing| narrowing.admits(garment))
    }

    /// Styles candidates are ranked against
    ///
    /// Explicit preferences win; otherwise the weather or event style hints.
    pub fn ranking_styles(&self) -> &LabelSet {
        match &self.narrowing {
            Some(narrowing) if self.preferred_styles.is_empty() => narrowing.styles(),
            _ => &self.preferred_styles,
        }
    }

    fn within_budget(&self, garment: &Garment) -> bool {
        if self.use_owned_only {
            return true;
        }
        match (self.budget_ceiling, garment.price) {
            (Some(ceiling), Some(price)) => price <= ceiling,
            _ => true,
        }
    }
}

/// Empty allowed set or empty garment set ("any") both match
fn open_set_matches(allowed: &LabelSet, garment_labels: &LabelSet) -> bool {
    allowed.is_empty() || garment_labels.is_empty() || overlaps(garment_labels, allowed)
}

fn style_in(styles: &LabelSet, garment: &Garment) -> bool {
    garment
        .style
        .as_deref()
        .is_some_and(|style| contains_label(styles, style))
}
