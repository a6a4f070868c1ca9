//! Item definitions and the packing contract they share.
//!
//! Every item variant implements [`Packable`]: it can say whether it applies
//! to a [`Context`], produce a packed snapshot for a [`Trip`], report the
//! count decided during packing, and render itself. [`Item`] is the closed
//! set of variants a catalog holds.
//!
//! Packing never mutates a definition. `pack` clones it, resolves the count
//! against the trip, and returns the clone.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consumable::{ConsumableItem, ConsumableTemperatureItem, CustomConsumableItem};
use crate::context::{Context, Trip};
use crate::property::{Property, PropertySet};

/// Shared capability of every item variant.
pub trait Packable: fmt::Display {
    /// Whether the item belongs on a list for `context`.
    fn satisfies(&self, context: &Context) -> bool;

    /// A packed copy of this item with its count resolved for `trip`.
    fn pack(&self, trip: &Trip) -> Self
    where
        Self: Sized;

    /// Units packed. Zero for unpacked definitions and for items that did not apply.
    fn count(&self) -> f64;
}

/// Simplest item: a name and prerequisites, no quantity. A tent, say.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicItem {
    pub name: String,
    /// Properties the context must have for this item to appear.
    #[serde(default)]
    pub prerequisites: PropertySet,
    #[serde(skip)]
    count: f64,
}

impl BasicItem {
    pub fn new<A, D>(name: impl Into<String>, allow: A, disallow: D) -> Self
    where
        A: IntoIterator,
        A::Item: Into<Property>,
        D: IntoIterator,
        D::Item: Into<Property>,
    {
        Self {
            name: name.into(),
            prerequisites: PropertySet::new(allow, disallow),
            count: 0.0,
        }
    }
}

impl Packable for BasicItem {
    fn satisfies(&self, context: &Context) -> bool {
        self.prerequisites.satisfies(context)
    }

    fn pack(&self, trip: &Trip) -> Self {
        let mut packed = self.clone();
        packed.count = if self.satisfies(&trip.context) { 1.0 } else { 0.0 };
        packed
    }

    fn count(&self) -> f64 {
        self.count
    }
}

impl fmt::Display for BasicItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An item that only applies within a temperature range, like a parka.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureItem {
    pub name: String,
    #[serde(default)]
    pub prerequisites: PropertySet,
    /// Coldest temperature the item is useful at.
    pub temperature_min: i32,
    /// Warmest temperature the item is useful at.
    pub temperature_max: i32,
    #[serde(skip)]
    count: f64,
}

impl TemperatureItem {
    pub fn new<A, D>(name: impl Into<String>, min: i32, max: i32, allow: A, disallow: D) -> Self
    where
        A: IntoIterator,
        A::Item: Into<Property>,
        D: IntoIterator,
        D::Item: Into<Property>,
    {
        Self {
            name: name.into(),
            prerequisites: PropertySet::new(allow, disallow),
            temperature_min: min,
            temperature_max: max,
            count: 0.0,
        }
    }
}

impl Packable for TemperatureItem {
    fn satisfies(&self, context: &Context) -> bool {
        context.overlaps_temperature(self.temperature_min, self.temperature_max)
            && self.prerequisites.satisfies(context)
    }

    fn pack(&self, trip: &Trip) -> Self {
        let mut packed = self.clone();
        packed.count = if self.satisfies(&trip.context) { 1.0 } else { 0.0 };
        packed
    }

    fn count(&self) -> f64 {
        self.count
    }
}

impl fmt::Display for TemperatureItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Any item a catalog can hold.
#[derive(Debug, Clone)]
pub enum Item {
    Basic(BasicItem),
    Temperature(TemperatureItem),
    Consumable(ConsumableItem),
    CustomConsumable(CustomConsumableItem),
    ConsumableTemperature(ConsumableTemperatureItem),
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::Basic(i) => &i.name,
            Item::Temperature(i) => &i.name,
            Item::Consumable(i) => &i.name,
            Item::CustomConsumable(i) => &i.name,
            Item::ConsumableTemperature(i) => &i.consumable.name,
        }
    }

    pub fn prerequisites(&self) -> &PropertySet {
        match self {
            Item::Basic(i) => &i.prerequisites,
            Item::Temperature(i) => &i.prerequisites,
            Item::Consumable(i) => &i.prerequisites,
            Item::CustomConsumable(i) => &i.prerequisites,
            Item::ConsumableTemperature(i) => &i.consumable.prerequisites,
        }
    }

    /// Temperature bounds, for the variants that have them.
    pub fn temperature_range(&self) -> Option<(i32, i32)> {
        match self {
            Item::Temperature(i) => Some((i.temperature_min, i.temperature_max)),
            Item::ConsumableTemperature(i) => Some((i.temperature_min, i.temperature_max)),
            _ => None,
        }
    }

    /// Whether the item ended up on the list.
    pub fn is_packed(&self) -> bool {
        self.count() > 0.0
    }
}

impl Packable for Item {
    fn satisfies(&self, context: &Context) -> bool {
        match self {
            Item::Basic(i) => i.satisfies(context),
            Item::Temperature(i) => i.satisfies(context),
            Item::Consumable(i) => i.satisfies(context),
            Item::CustomConsumable(i) => i.satisfies(context),
            Item::ConsumableTemperature(i) => i.satisfies(context),
        }
    }

    fn pack(&self, trip: &Trip) -> Self {
        match self {
            Item::Basic(i) => Item::Basic(i.pack(trip)),
            Item::Temperature(i) => Item::Temperature(i.pack(trip)),
            Item::Consumable(i) => Item::Consumable(i.pack(trip)),
            Item::CustomConsumable(i) => Item::CustomConsumable(i.pack(trip)),
            Item::ConsumableTemperature(i) => Item::ConsumableTemperature(i.pack(trip)),
        }
    }

    fn count(&self) -> f64 {
        match self {
            Item::Basic(i) => i.count(),
            Item::Temperature(i) => i.count(),
            Item::Consumable(i) => i.count(),
            Item::CustomConsumable(i) => i.count(),
            Item::ConsumableTemperature(i) => i.count(),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Basic(i) => fmt::Display::fmt(i, f),
            Item::Temperature(i) => fmt::Display::fmt(i, f),
            Item::Consumable(i) => fmt::Display::fmt(i, f),
            Item::CustomConsumable(i) => fmt::Display::fmt(i, f),
            Item::ConsumableTemperature(i) => fmt::Display::fmt(i, f),
        }
    }
}

impl From<BasicItem> for Item {
    fn from(item: BasicItem) -> Self {
        Item::Basic(item)
    }
}

impl From<TemperatureItem> for Item {
    fn from(item: TemperatureItem) -> Self {
        Item::Temperature(item)
    }
}

impl From<ConsumableItem> for Item {
    fn from(item: ConsumableItem) -> Self {
        Item::Consumable(item)
    }
}

impl From<CustomConsumableItem> for Item {
    fn from(item: CustomConsumableItem) -> Self {
        Item::CustomConsumable(item)
    }
}

impl From<ConsumableTemperatureItem> for Item {
    fn from(item: ConsumableTemperatureItem) -> Self {
        Item::ConsumableTemperature(item)
    }
}

/// Item definition error.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemError {
    /// Name is empty or whitespace.
    EmptyName,
    /// Daily rate below zero.
    NegativeRate(f64),
    /// Daily rate is NaN or infinite.
    NonFiniteRate(f64),
    /// Minimum temperature above maximum.
    InvertedTemperatureRange { min: i32, max: i32 },
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemError::EmptyName => write!(f, "item name is empty"),
            ItemError::NegativeRate(r) => write!(f, "daily rate is negative: {}", r),
            ItemError::NonFiniteRate(r) => write!(f, "daily rate is not finite: {}", r),
            ItemError::InvertedTemperatureRange { min, max } => {
                write!(f, "temperature range inverted: min {} > max {}", min, max)
            }
        }
    }
}

impl std::error::Error for ItemError {}

/// Validate an item definition, returning all errors found.
///
/// Custom-rate items are only checked for their name; the rate function is
/// opaque until a trip is packed.
pub fn validate_item(item: &Item) -> Vec<ItemError> {
    let mut errors = Vec::new();

    if item.name().trim().is_empty() {
        errors.push(ItemError::EmptyName);
    }

    let rate = match item {
        Item::Consumable(i) => Some(i.daily_rate),
        Item::ConsumableTemperature(i) => Some(i.consumable.daily_rate),
        _ => None,
    };
    if let Some(rate) = rate {
        if !rate.is_finite() {
            errors.push(ItemError::NonFiniteRate(rate));
        } else if rate < 0.0 {
            errors.push(ItemError::NegativeRate(rate));
        }
    }

    if let Some((min, max)) = item.temperature_range() {
        if min > max {
            errors.push(ItemError::InvertedTemperatureRange { min, max });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumable::Units;

    const NONE: [&str; 0] = [];

    fn trip(days: u32, ctx: Context) -> Trip {
        Trip::new(days, ctx)
    }

    #[test]
    fn test_unpacked_count_is_zero() {
        let tent = BasicItem::new("tent", ["camping"], NONE);
        assert_eq!(tent.count(), 0.0);
    }

    #[test]
    fn test_basic_pack() {
        let tent = BasicItem::new("tent", ["camping"], ["hotel"]);
        let camping = trip(3, Context::new(50, 70).with("camping", true));
        let hotel = trip(3, Context::new(50, 70).with("camping", true).with("hotel", true));

        let packed = tent.pack(&camping);
        assert_eq!(packed.count(), 1.0);
        assert_eq!(packed.to_string(), "tent");
        assert_eq!(tent.pack(&hotel).count(), 0.0);
        assert_eq!(tent.count(), 0.0, "definition must not change");
    }

    #[test]
    fn test_basic_unconstrained_always_packs() {
        let toothbrush = BasicItem::new("toothbrush", NONE, NONE);
        assert_eq!(toothbrush.pack(&Trip::default()).count(), 1.0);
    }

    #[test]
    fn test_temperature_boundary_touch() {
        let jacket = TemperatureItem::new("light jacket", 32, 60, NONE, NONE);
        assert_eq!(jacket.pack(&trip(2, Context::new(60, 70))).count(), 1.0);
        assert_eq!(jacket.pack(&trip(2, Context::new(61, 70))).count(), 0.0);
        assert_eq!(jacket.pack(&trip(2, Context::new(0, 31))).count(), 0.0);
        assert_eq!(jacket.pack(&trip(2, Context::new(0, 32))).count(), 1.0);
    }

    #[test]
    fn test_temperature_and_properties() {
        let gloves = TemperatureItem::new("ski gloves", -20, 30, ["skiing"], NONE);
        let cold = Context::new(10, 25);
        assert!(!gloves.satisfies(&cold));
        assert!(gloves.satisfies(&cold.clone().with("skiing", true)));
        assert!(!gloves.satisfies(&Context::new(40, 60).with("skiing", true)));
    }

    #[test]
    fn test_pack_twice_same_count() {
        let item: Item = ConsumableItem::new("socks", 1.0, Units::None, NONE, NONE).into();
        let t = trip(5, Context::default());
        assert_eq!(item.pack(&t).count(), item.pack(&t).count());
        assert_eq!(item.count(), 0.0);
    }

    #[test]
    fn test_enum_dispatch() {
        let items: Vec<Item> = vec![
            BasicItem::new("tent", ["camping"], NONE).into(),
            TemperatureItem::new("parka", -40, 20, NONE, NONE).into(),
            ConsumableItem::new("water", 2.0, Units::named("liters"), NONE, NONE).into(),
        ];
        let t = trip(2, Context::new(10, 30).with("camping", true));
        let rendered: Vec<String> = items.iter().map(|i| i.pack(&t).to_string()).collect();
        assert_eq!(rendered, vec!["tent", "parka", "4 liters of water"]);
        assert_eq!(items[1].temperature_range(), Some((-40, 20)));
        assert_eq!(items[0].temperature_range(), None);
        assert_eq!(items[0].prerequisites().requirement("camping"), Some(true));
    }

    #[test]
    fn test_validate_item() {
        let good: Item = ConsumableTemperatureItem::new(
            "hand warmers",
            2.0,
            Units::named("pairs"),
            -10,
            40,
            NONE,
            NONE,
        )
        .into();
        assert!(validate_item(&good).is_empty());

        let bad: Item =
            ConsumableTemperatureItem::new(" ", -1.0, Units::None, 50, 10, NONE, NONE).into();
        assert_eq!(
            validate_item(&bad),
            vec![
                ItemError::EmptyName,
                ItemError::NegativeRate(-1.0),
                ItemError::InvertedTemperatureRange { min: 50, max: 10 },
            ]
        );

        let nan: Item = ConsumableItem::new("fuel", f64::NAN, Units::None, NONE, NONE).into();
        let errors = validate_item(&nan);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ItemError::NonFiniteRate(_)));
    }
}
