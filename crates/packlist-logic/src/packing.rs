//! Catalog packing: evaluate every definition against one trip.
//!
//! The catalog is a caller-owned slice of [`Item`] definitions. Its order
//! is the order of the resulting list.

use crate::context::Trip;
use crate::item::{Item, Packable};

/// Pack every definition, keeping items that did not apply (count 0).
pub fn pack_all(trip: &Trip, catalog: &[Item]) -> Vec<Item> {
    catalog
        .iter()
        .map(|item| {
            let packed = item.pack(trip);
            log::debug!("Packed {:?}: count={}", item.name(), packed.count());
            packed
        })
        .collect()
}

/// Pack the catalog and keep only items with a positive count.
pub fn pack_list(trip: &Trip, catalog: &[Item]) -> Vec<Item> {
    let packed: Vec<Item> = pack_all(trip, catalog)
        .into_iter()
        .filter(Item::is_packed)
        .collect();
    log::debug!(
        "Packing list for {} day(s): {} of {} items",
        trip.days,
        packed.len(),
        catalog.len()
    );
    packed
}

/// Display line for each item, in order.
pub fn render_list(items: &[Item]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
