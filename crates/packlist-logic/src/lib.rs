//! Pure packing-list logic.
//!
//! Decides which items belong on a packing list for a trip and how many of
//! each to bring. No I/O, no file formats: callers supply the catalog of
//! item definitions and a [`context::Trip`], and get packed snapshots back.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`property`] | Property tags and allow/disallow sets gating applicability |
//! | [`context`] | Trip context (properties, temperature range), trip length, validation |
//! | [`item`] | The `Packable` contract, plain and temperature items, the `Item` enum |
//! | [`consumable`] | Rate-based, custom-rate, and temperature-gated consumables |
//! | [`packing`] | Packing a whole catalog against one trip |
//!
//! ```
//! use packlist_logic::consumable::ConsumableItem;
//! use packlist_logic::context::{Context, Trip};
//! use packlist_logic::item::{BasicItem, Item};
//! use packlist_logic::packing::{pack_list, render_list};
//!
//! let catalog: Vec<Item> = vec![
//!     BasicItem::new("tent", ["camping"], ["hotel"]).into(),
//!     ConsumableItem::new("water", 2.0, "liters", ["camping"], Vec::<&str>::new()).into(),
//! ];
//! let trip = Trip::new(3, Context::new(50, 75).with("camping", true));
//! let list = pack_list(&trip, &catalog);
//! assert_eq!(render_list(&list), vec!["tent", "6 liters of water"]);
//! ```

pub mod consumable;
pub mod context;
pub mod item;
pub mod packing;
pub mod property;
