use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{union_labels, Garment, LabelSet, Slot};

/// One generated outfit
///
/// Candidates live only for the duration of a recommendation call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutfitCandidate {
    pub id: Uuid,
    pub name: String,
    pub garments: Vec<Garment>,
    /// Sum of member prices, missing prices counted as zero
    pub aggregate_price: Decimal,
    /// Union of member colors
    pub colors: LabelSet,
    /// Union of member styles
    pub styles: LabelSet,
    /// Only assigned in scored ranking mode
    pub score: Option<f64>,
}

impl OutfitCandidate {
    /// Builds a candidate and derives its price and label unions
    pub fn assemble(id: Uuid, name: String, garments: Vec<Garment>) -> Self {
        let aggregate_price = garments.iter().map(Garment::price_or_zero).sum();
        let colors = union_labels(
            garments
                .iter()
                .flat_map(|g| g.colors.iter().map(String::as_str)),
        );
        let styles = union_labels(garments.iter().filter_map(|g| g.style.as_deref()));

        Self {
            id,
            name,
            garments,
            aggregate_price,
            colors,
            styles,
            score: None,
        }
    }

    /// Garment occupying `slot`, if any
    pub fn garment_in(&self, slot: Slot) -> Option<&Garment> {
        self.garments.iter().find(|g| g.slot == slot)
    }

    pub fn is_empty(&self) -> bool {
        self.garments.is_empty()
    }
}
