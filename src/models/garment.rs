use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LabelSet;

/// Semantic slot a garment fills in an outfit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Top,
    Bottom,
    Outerwear,
    Footwear,
    Accessory,
    /// Catch-all for unrecognized garment types; never selected automatically
    Other,
}

impl Slot {
    /// Slots an outfit fills whenever the pool has something for them
    pub const MANDATORY: [Slot; 3] = [Slot::Top, Slot::Bottom, Slot::Footwear];

    /// Maps a free-text garment type to its slot (case-insensitive)
    pub fn from_garment_type(garment_type: &str) -> Self {
        match garment_type.trim().to_ascii_lowercase().as_str() {
            "shirt" | "t-shirt" | "sweater" | "blouse" => Slot::Top,
            "pants" | "jeans" | "shorts" | "skirt" => Slot::Bottom,
            "jacket" | "coat" | "blazer" => Slot::Outerwear,
            "shoes" | "boots" | "sneakers" => Slot::Footwear,
            "accessory" => Slot::Accessory,
            _ => Slot::Other,
        }
    }
}

/// Clothing record as returned by the inventory store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct RawGarmentRecord {
    pub id: Uuid,
    pub name: String,
    /// Free-text type ("Shirt", "Jeans", ...)
    #[serde(rename = "type")]
    pub garment_type: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub seasons: Vec<String>,
    #[serde(default)]
    pub occasions: Vec<String>,
}

/// Typed, immutable garment snapshot used by the engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Garment {
    pub id: Uuid,
    pub name: String,
    pub slot: Slot,
    /// Individual color labels; a comma-joined source color is split
    pub colors: LabelSet,
    pub style: Option<String>,
    pub brand: Option<String>,
    /// Non-negative price, if known
    pub price: Option<Decimal>,
    /// Empty means "any season"
    pub seasons: LabelSet,
    /// Empty means "any occasion"
    pub occasions: LabelSet,
}

impl Garment {
    /// Price used for aggregation; a missing price counts as zero
    pub fn price_or_zero(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_lookup_is_case_insensitive() {
        assert_eq!(Slot::from_garment_type("shirt"), Slot::Top);
        assert_eq!(Slot::from_garment_type("T-SHIRT"), Slot::Top);
        assert_eq!(Slot::from_garment_type(" Jeans "), Slot::Bottom);
        assert_eq!(Slot::from_garment_type("Blazer"), Slot::Outerwear);
        assert_eq!(Slot::from_garment_type("sneakers"), Slot::Footwear);
        assert_eq!(Slot::from_garment_type("Accessory"), Slot::Accessory);
    }

    #[test]
    fn test_unknown_type_maps_to_other() {
        assert_eq!(Slot::from_garment_type("Scarf"), Slot::Other);
        assert_eq!(Slot::from_garment_type(""), Slot::Other);
        assert!(!Slot::MANDATORY.contains(&Slot::Other));
    }

    #[test]
    fn test_raw_record_uses_type_key() {
        let json = r#"{
            "id": "7d1d6b53-4a5e-4a4f-9a59-3a1f3e0f6a11",
            "name": "Oxford",
            "type": "Shirt",
            "price": "20"
        }"#;
        let record: RawGarmentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.garment_type, "Shirt");
        assert_eq!(record.price, Some(Decimal::from(20)));
        assert!(record.seasons.is_empty());
    }
}
