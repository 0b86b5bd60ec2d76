//! Garment catalog adapter
//!
//! Turns raw inventory rows into typed [`Garment`] values and buckets them by
//! slot. Unrecognized garment types land in [`Slot::Other`] without error and
//! are never drawn by the generator.
use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{clean_label, label_set, split_labels, Garment, RawGarmentRecord, Slot};

/// Normalizes raw inventory records into garments
pub fn normalize(raw_items: Vec<RawGarmentRecord>) -> Vec<Garment> {
    let garments: Vec<Garment> = raw_items.into_iter().map(normalize_record).collect();

    let unslotted = garments.iter().filter(|g| g.slot == Slot::Other).count();
    if unslotted > 0 {
        tracing::debug!(
            unslotted,
            total = garments.len(),
            "Garments with unrecognized types excluded from slot selection"
        );
    }

    garments
}

fn normalize_record(record: RawGarmentRecord) -> Garment {
    let price = match record.price {
        Some(price) if price < Decimal::ZERO => {
            tracing::warn!(garment_id = %record.id, %price, "Negative price treated as missing");
            None
        }
        other => other,
    };

    Garment {
        id: record.id,
        slot: Slot::from_garment_type(&record.garment_type),
        name: record.name,
        colors: record
            .color
            .as_deref()
            .map(split_labels)
            .unwrap_or_default(),
        style: record.style.as_deref().and_then(clean_label),
        brand: record.brand.as_deref().and_then(clean_label),
        price,
        seasons: label_set(&record.seasons),
        occasions: label_set(&record.occasions),
    }
}

/// Garments bucketed by slot
#[derive(Debug, Clone, Default)]
pub struct SlotPartition {
    slots: BTreeMap<Slot, Vec<Garment>>,
}

impl SlotPartition {
    pub fn from_garments<I>(garments: I) -> Self
    where
        I: IntoIterator<Item = Garment>,
    {
        let mut slots: BTreeMap<Slot, Vec<Garment>> = BTreeMap::new();
        for garment in garments {
            slots.entry(garment.slot).or_default().push(garment);
        }
        Self { slots }
    }

    /// Garments in `slot`; empty when the slot has none
    pub fn get(&self, slot: Slot) -> &[Garment] {
        self.slots.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total garments across every slot, `Other` included
    pub fn len(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
