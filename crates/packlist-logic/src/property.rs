//! Property tags and the allow/disallow sets that gate item applicability.
//!
//! A [`PropertySet`] maps each property name to the value it requires:
//! `true` for an allow entry, `false` for an exclusion. Evaluation against a
//! [`Context`] is OR over the allow entries and AND-NOT over the exclusions:
//!
//! - an empty set is always satisfied
//! - a single excluded property that is set in the context vetoes the item
//! - otherwise at least one allowed property must be set in the context
//!
//! A set holding only exclusions can veto but never satisfies on its own.
//!
//! ```
//! use packlist_logic::context::Context;
//! use packlist_logic::property::PropertySet;
//!
//! let set = PropertySet::new(["camping"], ["car"]);
//! let ctx = Context::new(40, 70).with("camping", true);
//! assert!(set.satisfies(&ctx));
//! assert!(!set.satisfies(&ctx.with("car", true)));
//! ```

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::Context;

/// A named boolean tag such as `"winter"` or `"car-camping"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Property(String);

impl Property {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Property {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Property {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for Property {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Required property values for an item to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet(BTreeMap<Property, bool>);

impl PropertySet {
    /// Build a set from an allow list and a disallow list.
    ///
    /// Disallow entries are applied last, so a name present in both lists
    /// ends up as an exclusion.
    pub fn new<A, D>(allow: A, disallow: D) -> Self
    where
        A: IntoIterator,
        A::Item: Into<Property>,
        D: IntoIterator,
        D::Item: Into<Property>,
    {
        let mut entries = BTreeMap::new();
        for p in allow {
            entries.insert(p.into(), true);
        }
        for p in disallow {
            let p = p.into();
            if entries.insert(p.clone(), false) == Some(true) {
                log::warn!("Property {} is both allowed and disallowed; disallow wins", p);
            }
        }
        Self(entries)
    }

    /// Names that appear in both input lists.
    pub fn conflicts<A, D>(allow: A, disallow: D) -> Vec<Property>
    where
        A: IntoIterator,
        A::Item: Into<Property>,
        D: IntoIterator,
        D::Item: Into<Property>,
    {
        let allowed: Vec<Property> = allow.into_iter().map(Into::into).collect();
        let mut found: Vec<Property> = disallow
            .into_iter()
            .map(Into::into)
            .filter(|p| allowed.contains(p))
            .collect();
        found.sort();
        found.dedup();
        found
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Required value for `name`, if the set mentions it.
    pub fn requirement(&self, name: &str) -> Option<bool> {
        self.0.get(name).copied()
    }

    /// Whether `context` meets this set's requirements.
    pub fn satisfies(&self, context: &Context) -> bool {
        if self.0.is_empty() {
            return true;
        }
        let mut found = false;
        for (name, &required) in &self.0 {
            let Some(actual) = context.property(name.name()) else {
                continue;
            };
            if !actual {
                continue;
            }
            if !required {
                return false;
            }
            found = true;
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const NAMES: [&str; 6] = ["camping", "car", "winter", "beach", "hiking", "international"];

    fn random_context(rng: &mut StdRng) -> Context {
        let mut ctx = Context::new(0, 100);
        for name in NAMES {
            if rng.gen_bool(0.6) {
                ctx = ctx.with(name, rng.gen_bool(0.5));
            }
        }
        ctx
    }

    #[test]
    fn test_empty_set_always_satisfied() {
        let set = PropertySet::new(Vec::<&str>::new(), Vec::<&str>::new());
        assert!(set.is_empty());
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(set.satisfies(&random_context(&mut rng)));
        }
    }

    #[test]
    fn test_disallow_vetoes_any_allow() {
        let set = PropertySet::new(["camping", "hiking", "beach"], ["car"]);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let ctx = random_context(&mut rng).with("car", true);
            assert!(!set.satisfies(&ctx), "car=true must veto: {:?}", ctx);
        }
    }

    #[test]
    fn test_no_overlap_fails() {
        let set = PropertySet::new(["camping"], ["car"]);
        let ctx = Context::new(0, 100).with("winter", true).with("beach", true);
        assert!(!set.satisfies(&ctx));
    }

    #[test]
    fn test_any_allow_satisfies() {
        let set = PropertySet::new(["camping", "hiking"], Vec::<&str>::new());
        assert!(set.satisfies(&Context::new(0, 100).with("hiking", true)));
        assert!(set.satisfies(&Context::new(0, 100).with("camping", true)));
    }

    #[test]
    fn test_allow_present_but_false_not_found() {
        let set = PropertySet::new(["camping"], Vec::<&str>::new());
        assert!(!set.satisfies(&Context::new(0, 100).with("camping", false)));
    }

    #[test]
    fn test_disallow_present_but_false_no_veto() {
        let set = PropertySet::new(["camping"], ["car"]);
        let ctx = Context::new(0, 100).with("camping", true).with("car", false);
        assert!(set.satisfies(&ctx));
    }

    #[test]
    fn test_exclusion_only_never_satisfies() {
        let set = PropertySet::new(Vec::<&str>::new(), ["car", "beach"]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            assert!(!set.satisfies(&random_context(&mut rng)));
        }
    }

    #[test]
    fn test_disallow_wins_on_conflict() {
        let set = PropertySet::new(["camping", "car"], ["car"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.requirement("car"), Some(false));
        assert_eq!(set.requirement("camping"), Some(true));
        assert_eq!(set.requirement("beach"), None);
    }

    #[test]
    fn test_conflicts_listed() {
        let found = PropertySet::conflicts(["car", "camping", "beach"], ["beach", "car", "car"]);
        assert_eq!(found, vec![Property::from("beach"), Property::from("car")]);
        assert!(PropertySet::conflicts(["a"], ["b"]).is_empty());
    }
}
