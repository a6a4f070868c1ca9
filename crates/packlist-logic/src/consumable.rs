//! Consumable items: quantities that scale with trip length.
//!
//! Count resolution:
//! - [`ConsumableItem`]: `ceil(daily_rate × days)`
//! - [`CustomConsumableItem`]: `rate_fn(days)`, unrounded
//! - [`ConsumableTemperatureItem`]: `ceil(daily_rate × days)`, gated by temperature
//!
//! All three render as `"<count> <units> of <name>"`, dropping the
//! `"<units> of"` part for unitless items ("3 shirts").

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::{Context, Trip};
use crate::item::Packable;
use crate::property::{Property, PropertySet};

/// Catalog spelling of [`Units::None`].
pub const NO_UNITS: &str = "nounits";

/// Unit label for a consumable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Units {
    /// Counted directly: "2 cars".
    None,
    /// Measured in a unit: "3 liters of water".
    Named(String),
}

impl Units {
    pub fn named(label: impl Into<String>) -> Self {
        Units::Named(label.into())
    }
}

impl From<&str> for Units {
    fn from(label: &str) -> Self {
        if label == NO_UNITS {
            Units::None
        } else {
            Units::Named(label.to_string())
        }
    }
}

impl From<String> for Units {
    fn from(label: String) -> Self {
        if label == NO_UNITS {
            Units::None
        } else {
            Units::Named(label)
        }
    }
}

impl From<Units> for String {
    fn from(units: Units) -> Self {
        match units {
            Units::None => NO_UNITS.to_string(),
            Units::Named(label) => label,
        }
    }
}

/// Render a count as an integer when whole, otherwise with one decimal.
///
/// Non-finite counts print as `inf`, `-inf` or `NaN`.
pub fn format_count(count: f64) -> String {
    if !count.is_finite() {
        format!("{}", count)
    } else if count == 0.0 {
        // -0.0 prints as "-0" under {:.0}
        "0".to_string()
    } else if count == count.trunc() {
        format!("{:.0}", count)
    } else {
        format!("{:.1}", count)
    }
}

fn write_quantity(f: &mut fmt::Formatter<'_>, count: f64, units: &Units, name: &str) -> fmt::Result {
    match units {
        Units::None => write!(f, "{} {}", format_count(count), name),
        Units::Named(label) => write!(f, "{} {} of {}", format_count(count), label, name),
    }
}

fn daily_quantity(rate: f64, days: u32) -> f64 {
    (rate * days as f64).ceil()
}

/// An item used up at a fixed rate per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumableItem {
    pub name: String,
    #[serde(default)]
    pub prerequisites: PropertySet,
    /// Units used per day.
    pub daily_rate: f64,
    pub units: Units,
    #[serde(skip)]
    count: f64,
}

impl ConsumableItem {
    pub fn new<A, D>(
        name: impl Into<String>,
        daily_rate: f64,
        units: impl Into<Units>,
        allow: A,
        disallow: D,
    ) -> Self
    where
        A: IntoIterator,
        A::Item: Into<Property>,
        D: IntoIterator,
        D::Item: Into<Property>,
    {
        Self {
            name: name.into(),
            prerequisites: PropertySet::new(allow, disallow),
            daily_rate,
            units: units.into(),
            count: 0.0,
        }
    }
}

impl Packable for ConsumableItem {
    fn satisfies(&self, context: &Context) -> bool {
        self.prerequisites.satisfies(context)
    }

    fn pack(&self, trip: &Trip) -> Self {
        let mut packed = self.clone();
        packed.count = if self.satisfies(&trip.context) {
            daily_quantity(self.daily_rate, trip.days)
        } else {
            0.0
        };
        packed
    }

    fn count(&self) -> f64 {
        self.count
    }
}

impl fmt::Display for ConsumableItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_quantity(f, self.count, &self.units, &self.name)
    }
}

/// Quantity for a trip of the given length.
pub type RateFn = Arc<dyn Fn(u32) -> f64 + Send + Sync>;

/// A consumable whose quantity comes from a caller-supplied function of the
/// trip length, e.g. "one bottle of sunscreen per week, at least one".
#[derive(Clone)]
pub struct CustomConsumableItem {
    pub name: String,
    pub prerequisites: PropertySet,
    pub units: Units,
    rate_fn: RateFn,
    count: f64,
}

impl CustomConsumableItem {
    pub fn new<F, A, D>(
        name: impl Into<String>,
        rate_fn: F,
        units: impl Into<Units>,
        allow: A,
        disallow: D,
    ) -> Self
    where
        F: Fn(u32) -> f64 + Send + Sync + 'static,
        A: IntoIterator,
        A::Item: Into<Property>,
        D: IntoIterator,
        D::Item: Into<Property>,
    {
        Self {
            name: name.into(),
            prerequisites: PropertySet::new(allow, disallow),
            units: units.into(),
            rate_fn: Arc::new(rate_fn),
            count: 0.0,
        }
    }

    /// Evaluate the rate function without packing.
    pub fn quantity_for(&self, days: u32) -> f64 {
        (self.rate_fn)(days)
    }
}

impl fmt::Debug for CustomConsumableItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomConsumableItem")
            .field("name", &self.name)
            .field("prerequisites", &self.prerequisites)
            .field("units", &self.units)
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl Packable for CustomConsumableItem {
    fn satisfies(&self, context: &Context) -> bool {
        self.prerequisites.satisfies(context)
    }

    fn pack(&self, trip: &Trip) -> Self {
        let mut packed = self.clone();
        packed.count = if self.satisfies(&trip.context) {
            self.quantity_for(trip.days)
        } else {
            0.0
        };
        packed
    }

    fn count(&self) -> f64 {
        self.count
    }
}

impl fmt::Display for CustomConsumableItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_quantity(f, self.count, &self.units, &self.name)
    }
}

/// A consumable that only applies within a temperature range.
///
/// Counts exactly like its [`ConsumableItem`] part; the range only decides
/// whether it is packed at all, and is not rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumableTemperatureItem {
    #[serde(flatten)]
    pub consumable: ConsumableItem,
    pub temperature_min: i32,
    pub temperature_max: i32,
}

impl ConsumableTemperatureItem {
    pub fn new<A, D>(
        name: impl Into<String>,
        daily_rate: f64,
        units: impl Into<Units>,
        min: i32,
        max: i32,
        allow: A,
        disallow: D,
    ) -> Self
    where
        A: IntoIterator,
        A::Item: Into<Property>,
        D: IntoIterator,
        D::Item: Into<Property>,
    {
        Self {
            consumable: ConsumableItem::new(name, daily_rate, units, allow, disallow),
            temperature_min: min,
            temperature_max: max,
        }
    }
}

impl Packable for ConsumableTemperatureItem {
    fn satisfies(&self, context: &Context) -> bool {
        context.overlaps_temperature(self.temperature_min, self.temperature_max)
            && self.consumable.satisfies(context)
    }

    fn pack(&self, trip: &Trip) -> Self {
        let mut packed = self.clone();
        packed.consumable.count = if self.satisfies(&trip.context) {
            daily_quantity(self.consumable.daily_rate, trip.days)
        } else {
            0.0
        };
        packed
    }

    fn count(&self) -> f64 {
        self.consumable.count
    }
}

impl fmt::Display for ConsumableTemperatureItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.consumable, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_units_sentinel() {
        assert_eq!(Units::from(NO_UNITS), Units::None);
        assert_eq!(Units::from("liters"), Units::named("liters"));
        assert_eq!(String::from(Units::None), "nounits");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(6.0), "6");
        assert_eq!(format_count(2.5), "2.5");
        assert_eq!(format_count(2.54), "2.5");
        assert_eq!(format_count(-3.0), "-3");
    }

    #[test]
    fn test_format_count_large_and_non_finite() {
        assert_eq!(format_count(1e20), "100000000000000000000");
        assert_eq!(format_count(-1e19), "-10000000000000000000");
        assert_eq!(format_count(-0.0), "0");
        assert_eq!(format_count(f64::INFINITY), "inf");
        assert_eq!(format_count(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_count(f64::NAN), "NaN");
    }

    #[test]
    fn test_custom_rate_huge_count_renders_whole() {
        let grains = CustomConsumableItem::new("grains", |_| 1e20, Units::None, NONE, NONE);
        let packed = grains.pack(&Trip::default());
        assert_eq!(packed.to_string(), "100000000000000000000 grains");
    }

    #[test]
    fn test_rate_rounds_up() {
        let snacks = ConsumableItem::new("snacks", 1.5, Units::named("bags"), NONE, NONE);
        let packed = snacks.pack(&Trip::new(4, Context::default()));
        assert_eq!(packed.count(), 6.0);
        assert_eq!(packed.to_string(), "6 bags of snacks");

        let packed = snacks.pack(&Trip::new(3, Context::default()));
        assert_eq!(packed.count(), 5.0, "ceil(4.5)");
    }

    #[test]
    fn test_unitless_render() {
        let shirts = ConsumableItem::new("shirts", 1.0, NO_UNITS, NONE, NONE);
        let packed = shirts.pack(&Trip::new(3, Context::default()));
        assert_eq!(packed.to_string(), "3 shirts");
    }

    #[test]
    fn test_repack_uses_definition_rate() {
        let water = ConsumableItem::new("water", 2.0, "liters", NONE, NONE);
        let trip = Trip::new(3, Context::default());
        let once = water.pack(&trip);
        let twice = once.pack(&trip);
        assert_eq!(once.count(), 6.0);
        assert_eq!(twice.count(), 6.0, "packing must not compound the rate");
    }

    #[test]
    fn test_not_applicable_is_zero() {
        let gas = ConsumableItem::new("gas", 0.5, Units::named("gallons"), ["car"], NONE);
        let packed = gas.pack(&Trip::new(10, Context::default().with("car", false)));
        assert_eq!(packed.count(), 0.0);
        assert_eq!(packed.to_string(), "0 gallons of gas");
    }

    #[test]
    fn test_custom_rate_unrounded() {
        let soap = CustomConsumableItem::new("soap", |days| days as f64 / 2.0, "bars", NONE, NONE);
        let packed = soap.pack(&Trip::new(5, Context::default()));
        assert_eq!(packed.count(), 2.5);
        assert_eq!(packed.to_string(), "2.5 bars of soap");
        assert!(packed.to_string().contains(".5"));
        assert_eq!(soap.count(), 0.0);
    }

    #[test]
    fn test_custom_rate_gated() {
        let film = CustomConsumableItem::new(
            "film rolls",
            |days| (days as f64 / 3.0).ceil().max(1.0),
            Units::None,
            ["photography"],
            NONE,
        );
        assert_eq!(film.pack(&Trip::new(7, Context::default())).count(), 0.0);
        let ctx = Context::default().with("photography", true);
        assert_eq!(film.pack(&Trip::new(7, ctx)).count(), 3.0);
        assert_eq!(film.quantity_for(1), 1.0);
    }

    #[test]
    fn test_custom_debug_omits_fn() {
        let item = CustomConsumableItem::new("x", |_| 1.0, Units::None, NONE, NONE);
        let dbg = format!("{:?}", item);
        assert!(dbg.starts_with("CustomConsumableItem"));
        assert!(dbg.contains("name: \"x\""));
    }

    #[test]
    fn test_consumable_temperature_matches_plain() {
        let warmers =
            ConsumableTemperatureItem::new("hand warmers", 1.5, "pairs", -30, 35, ["outdoor"], NONE);
        let plain = ConsumableItem::new("hand warmers", 1.5, "pairs", ["outdoor"], NONE);

        let cold = Trip::new(4, Context::new(20, 30).with("outdoor", true));
        let packed = warmers.pack(&cold);
        assert_eq!(packed.count(), plain.pack(&cold).count());
        assert_eq!(packed.count(), 6.0);
        assert_eq!(packed.to_string(), "6 pairs of hand warmers");
        assert_eq!(packed.to_string(), plain.pack(&cold).to_string());
    }

    #[test]
    fn test_consumable_temperature_gated() {
        let warmers =
            ConsumableTemperatureItem::new("hand warmers", 1.0, "pairs", -30, 35, ["outdoor"], NONE);
        let hot = Trip::new(4, Context::new(36, 90).with("outdoor", true));
        assert_eq!(warmers.pack(&hot).count(), 0.0);
        let indoor = Trip::new(4, Context::new(20, 30));
        assert_eq!(warmers.pack(&indoor).count(), 0.0);
        let edge = Trip::new(4, Context::new(35, 90).with("outdoor", true));
        assert_eq!(warmers.pack(&edge).count(), 4.0);
    }
}
