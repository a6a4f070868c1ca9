//! Packlist Headless Harness
//!
//! Loads the demo catalog, packs it against canned trips, and checks the
//! results. Runs entirely in-process, with no files read at runtime.
//!
//! Usage:
//!   cargo run -p packlist-simtest
//!   cargo run -p packlist-simtest -- --verbose
//!   cargo run -p packlist-simtest -- --days 5 --temp 20:45 --with camping --without hotel
//!
//! Set `RUST_LOG=debug` to see per-item packing decisions.

use packlist_logic::consumable::{ConsumableItem, ConsumableTemperatureItem, CustomConsumableItem};
use packlist_logic::context::{validate_trip, Context, Trip};
use packlist_logic::item::{validate_item, BasicItem, Item, Packable, TemperatureItem};
use packlist_logic::packing::{pack_all, pack_list, render_list};
use packlist_logic::property::PropertySet;
use clap::Parser;
use serde::Deserialize;

// ── Demo catalog (embedded JSON) ────────────────────────────────────────
const CATALOG_JSON: &str = include_str!("../../../data/catalog.json");

/// Rate functions a catalog row can name for a custom consumable.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RateRule {
    /// One per started week, at least one.
    PerWeek,
    /// Half a unit per day, unrounded.
    HalfDaily,
}

impl RateRule {
    fn quantity(self, days: u32) -> f64 {
        match self {
            RateRule::PerWeek => (days as f64 / 7.0).ceil().max(1.0),
            RateRule::HalfDaily => days as f64 / 2.0,
        }
    }
}

/// One catalog row.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ItemSpec {
    Basic {
        name: String,
        #[serde(default)]
        allow: Vec<String>,
        #[serde(default)]
        disallow: Vec<String>,
    },
    Temperature {
        name: String,
        min: i32,
        max: i32,
        #[serde(default)]
        allow: Vec<String>,
        #[serde(default)]
        disallow: Vec<String>,
    },
    Consumable {
        name: String,
        rate: f64,
        units: String,
        #[serde(default)]
        allow: Vec<String>,
        #[serde(default)]
        disallow: Vec<String>,
    },
    Custom {
        name: String,
        rate: RateRule,
        units: String,
        #[serde(default)]
        allow: Vec<String>,
        #[serde(default)]
        disallow: Vec<String>,
    },
    ConsumableTemperature {
        name: String,
        rate: f64,
        units: String,
        min: i32,
        max: i32,
        #[serde(default)]
        allow: Vec<String>,
        #[serde(default)]
        disallow: Vec<String>,
    },
}

impl ItemSpec {
    fn name(&self) -> &str {
        match self {
            ItemSpec::Basic { name, .. }
            | ItemSpec::Temperature { name, .. }
            | ItemSpec::Consumable { name, .. }
            | ItemSpec::Custom { name, .. }
            | ItemSpec::ConsumableTemperature { name, .. } => name,
        }
    }

    fn lists(&self) -> (&[String], &[String]) {
        match self {
            ItemSpec::Basic {
                allow, disallow, ..
            }
            | ItemSpec::Temperature {
                allow, disallow, ..
            }
            | ItemSpec::Consumable {
                allow, disallow, ..
            }
            | ItemSpec::Custom {
                allow, disallow, ..
            }
            | ItemSpec::ConsumableTemperature {
                allow, disallow, ..
            } => (allow.as_slice(), disallow.as_slice()),
        }
    }

    fn into_item(self) -> Item {
        match self {
            ItemSpec::Basic {
                name,
                allow,
                disallow,
            } => BasicItem::new(name, allow, disallow).into(),
            ItemSpec::Temperature {
                name,
                min,
                max,
                allow,
                disallow,
            } => TemperatureItem::new(name, min, max, allow, disallow).into(),
            ItemSpec::Consumable {
                name,
                rate,
                units,
                allow,
                disallow,
            } => ConsumableItem::new(name, rate, units, allow, disallow).into(),
            ItemSpec::Custom {
                name,
                rate,
                units,
                allow,
                disallow,
            } => CustomConsumableItem::new(name, move |days| rate.quantity(days), units, allow, disallow)
                .into(),
            ItemSpec::ConsumableTemperature {
                name,
                rate,
                units,
                min,
                max,
                allow,
                disallow,
            } => ConsumableTemperatureItem::new(name, rate, units, min, max, allow, disallow).into(),
        }
    }
}

fn load_catalog() -> Result<Vec<ItemSpec>, serde_json::Error> {
    serde_json::from_str(CATALOG_JSON)
}

// ── Command line ────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "packlist-simtest")]
#[command(about = "Headless packing-list harness: runs the checks, or packs one trip")]
struct Options {
    /// Print every check and every scenario list
    #[arg(short, long)]
    verbose: bool,

    /// Trip length in days
    #[arg(long)]
    days: Option<u32>,

    /// Expected temperature range as MIN:MAX
    #[arg(long, value_name = "MIN:MAX", value_parser = parse_temp, allow_hyphen_values = true)]
    temp: Option<(i32, i32)>,

    /// Property declared true for the trip (repeatable)
    #[arg(long = "with", value_name = "NAME")]
    with: Vec<String>,

    /// Property declared false for the trip (repeatable)
    #[arg(long = "without", value_name = "NAME")]
    without: Vec<String>,
}

impl Options {
    /// Trip described by the flags. `None` when no trip flag was given.
    ///
    /// A name passed to both `--with` and `--without` ends up false.
    fn trip(&self) -> Option<Trip> {
        if self.days.is_none() && self.temp.is_none() && self.with.is_empty() && self.without.is_empty() {
            return None;
        }
        let defaults = Trip::default();
        let (min, max) = self.temp.unwrap_or((
            defaults.context.temperature_min,
            defaults.context.temperature_max,
        ));
        let declared = self
            .with
            .iter()
            .map(|name| (name, true))
            .chain(self.without.iter().map(|name| (name, false)));
        let context = declared.fold(Context::new(min, max), |ctx, (name, value)| {
            ctx.with(name.as_str(), value)
        });
        Some(Trip::new(self.days.unwrap_or(defaults.days), context))
    }
}

fn parse_temp(v: &str) -> Result<(i32, i32), String> {
    let (min, max) = v
        .split_once(':')
        .ok_or_else(|| format!("temperature range must be MIN:MAX, got {}", v))?;
    let min = min
        .trim()
        .parse()
        .map_err(|_| format!("invalid minimum temperature: {}", min))?;
    let max = max
        .trim()
        .parse()
        .map_err(|_| format!("invalid maximum temperature: {}", max))?;
    Ok((min, max))
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::init();

    let options = Options::parse();

    if let Some(trip) = options.trip() {
        std::process::exit(print_trip(&trip));
    }

    println!("=== Packlist Harness ===\n");

    let mut results = Vec::new();

    // 1. Catalog validation
    let (catalog_results, catalog) = validate_catalog(options.verbose);
    results.extend(catalog_results);

    if let Some(catalog) = catalog {
        // 2. Canned trips
        results.extend(validate_scenarios(&catalog, options.verbose));

        // 3. Quantities
        results.extend(validate_quantities(&catalog));
    }

    // 4. Property rules
    results.extend(validate_property_rules());

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

/// Pack the demo catalog for one trip and print it. Returns the exit code.
fn print_trip(trip: &Trip) -> i32 {
    let errors = validate_trip(trip);
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("invalid trip: {}", e);
        }
        return 1;
    }

    let catalog: Vec<Item> = match load_catalog() {
        Ok(specs) => specs.into_iter().map(ItemSpec::into_item).collect(),
        Err(e) => {
            eprintln!("catalog parse error: {}", e);
            return 1;
        }
    };

    log::info!("Loaded {} catalog items", catalog.len());

    let ctx = &trip.context;
    println!(
        "=== Packing list: {} day(s), {}..{} degrees ===",
        trip.days, ctx.temperature_min, ctx.temperature_max
    );
    for line in render_list(&pack_list(trip, &catalog)) {
        println!("  - {}", line);
    }
    0
}

// ── 1. Catalog ──────────────────────────────────────────────────────────

fn validate_catalog(verbose: bool) -> (Vec<TestResult>, Option<Vec<Item>>) {
    println!("--- Catalog ---");
    let mut results = Vec::new();

    let specs = match load_catalog() {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "catalog_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return (results, None);
        }
    };

    results.push(TestResult {
        name: "catalog_not_empty".into(),
        passed: specs.len() >= 10,
        detail: format!("{} item definitions loaded", specs.len()),
    });

    // Names are unique
    let mut names: Vec<&str> = specs.iter().map(ItemSpec::name).collect();
    names.sort_unstable();
    let before = names.len();
    names.dedup();
    results.push(TestResult {
        name: "catalog_unique_names".into(),
        passed: names.len() == before,
        detail: format!("{} duplicate names", before - names.len()),
    });

    // No property both allowed and disallowed
    let conflicted: Vec<String> = specs
        .iter()
        .filter_map(|s| {
            let (allow, disallow) = s.lists();
            let found = PropertySet::conflicts(allow.iter().cloned(), disallow.iter().cloned());
            if found.is_empty() {
                None
            } else {
                Some(s.name().to_string())
            }
        })
        .collect();
    results.push(TestResult {
        name: "catalog_no_conflicts".into(),
        passed: conflicted.is_empty(),
        detail: if conflicted.is_empty() {
            "no allow/disallow conflicts".into()
        } else {
            format!("conflicting properties in: {}", conflicted.join(", "))
        },
    });

    let catalog: Vec<Item> = specs.into_iter().map(ItemSpec::into_item).collect();
    log::info!("Loaded {} catalog items", catalog.len());

    // Definitions are well-formed
    let mut invalid = Vec::new();
    for item in &catalog {
        for e in validate_item(item) {
            if verbose {
                println!("  {}: {}", item.name(), e);
            }
            invalid.push(item.name().to_string());
        }
    }
    results.push(TestResult {
        name: "catalog_definitions_valid".into(),
        passed: invalid.is_empty(),
        detail: if invalid.is_empty() {
            "all definitions valid".into()
        } else {
            format!("{} invalid definitions", invalid.len())
        },
    });

    (results, Some(catalog))
}

// ── 2. Scenarios ────────────────────────────────────────────────────────

struct Scenario {
    name: &'static str,
    trip: Trip,
    includes: &'static [&'static str],
    excludes: &'static [&'static str],
    /// Exact rendered lines that must appear.
    lines: &'static [&'static str],
}

fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "winter_camping",
            trip: Trip::new(4, Context::new(10, 30).with("camping", true)),
            includes: &["tent", "sleeping bag", "camp stove", "headlamp", "winter coat"],
            excludes: &["passport", "swimsuit", "shorts", "light jacket"],
            lines: &["8 pairs of hand warmers", "12 liters of water", "4 pairs of socks"],
        },
        Scenario {
            name: "beach_resort",
            trip: Trip::new(
                7,
                Context::new(78, 92)
                    .with("beach", true)
                    .with("hotel", true)
                    .with("international", true),
            ),
            includes: &["passport", "power adapter", "shorts", "swimsuit"],
            excludes: &["tent", "winter coat", "hand warmers", "water"],
            lines: &["1 bottles of sunscreen", "4 shirts", "7 underwear"],
        },
        Scenario {
            name: "desert_backpacking",
            trip: Trip::new(
                3,
                Context::new(70, 105)
                    .with("backpacking", true)
                    .with("camping", true)
                    .with("hiking", true),
            ),
            includes: &["tent", "sleeping bag", "headlamp"],
            excludes: &["camp stove", "laptop", "books", "power adapter"],
            lines: &["9 liters of water", "6 electrolyte tablets"],
        },
    ]
}

fn validate_scenarios(catalog: &[Item], verbose: bool) -> Vec<TestResult> {
    println!("--- Scenarios ---");
    let mut results = Vec::new();

    for s in scenarios() {
        let errors = validate_trip(&s.trip);
        for e in &errors {
            log::warn!("Scenario {}: {}", s.name, e);
        }
        results.push(TestResult {
            name: format!("{}_trip_valid", s.name),
            passed: errors.is_empty(),
            detail: format!("{} trip errors", errors.len()),
        });

        let list = pack_list(&s.trip, catalog);
        let lines = render_list(&list);
        if verbose {
            println!("  {}:", s.name);
            for line in &lines {
                println!("    - {}", line);
            }
        }

        let missing: Vec<&str> = s
            .includes
            .iter()
            .copied()
            .filter(|name| !list.iter().any(|i| i.name() == *name))
            .collect();
        results.push(TestResult {
            name: format!("{}_includes", s.name),
            passed: missing.is_empty(),
            detail: if missing.is_empty() {
                format!("{} expected items packed", s.includes.len())
            } else {
                format!("missing: {}", missing.join(", "))
            },
        });

        let unwanted: Vec<&str> = s
            .excludes
            .iter()
            .copied()
            .filter(|name| list.iter().any(|i| i.name() == *name))
            .collect();
        results.push(TestResult {
            name: format!("{}_excludes", s.name),
            passed: unwanted.is_empty(),
            detail: if unwanted.is_empty() {
                format!("{} items correctly left out", s.excludes.len())
            } else {
                format!("unexpected: {}", unwanted.join(", "))
            },
        });

        let wrong: Vec<&str> = s
            .lines
            .iter()
            .copied()
            .filter(|line| !lines.iter().any(|l| l == line))
            .collect();
        results.push(TestResult {
            name: format!("{}_quantities", s.name),
            passed: wrong.is_empty(),
            detail: if wrong.is_empty() {
                format!("{} quantity lines match", s.lines.len())
            } else {
                format!("not found: {}", wrong.join(", "))
            },
        });
    }

    results
}

// ── 3. Quantities ───────────────────────────────────────────────────────

fn packed_count(trip: &Trip, catalog: &[Item], name: &str) -> Option<f64> {
    catalog
        .iter()
        .find(|i| i.name() == name)
        .map(|i| i.pack(trip).count())
}

fn validate_quantities(catalog: &[Item]) -> Vec<TestResult> {
    println!("--- Quantities ---");
    let mut results = Vec::new();

    // Fractional daily rates round up
    let five_days = Trip::new(5, Context::default());
    let shirts = packed_count(&five_days, catalog, "shirts");
    results.push(TestResult {
        name: "quantity_rate_rounds_up".into(),
        passed: shirts == Some(3.0),
        detail: format!("0.5/day × 5 days → {:?}", shirts),
    });

    // Custom rate is not rounded
    let books = CustomConsumableItem::new(
        "books",
        |days| days as f64 / 2.0,
        "nounits",
        Vec::<String>::new(),
        Vec::<String>::new(),
    );
    let packed = books.pack(&five_days);
    results.push(TestResult {
        name: "quantity_custom_unrounded".into(),
        passed: packed.count() == 2.5 && packed.to_string() == "2.5 books",
        detail: format!("days/2 × 5 days → {}", packed),
    });

    // Sunscreen: one bottle per started week
    let ski = |days| Trip::new(days, Context::new(0, 30).with("skiing", true));
    let week = packed_count(&ski(7), catalog, "sunscreen");
    let fortnight = packed_count(&ski(10), catalog, "sunscreen");
    results.push(TestResult {
        name: "quantity_per_week".into(),
        passed: week == Some(1.0) && fortnight == Some(2.0),
        detail: format!("7 days → {:?}, 10 days → {:?}", week, fortnight),
    });

    // Exclusion-only items never pack on their own
    let never = [1, 3, 7, 30]
        .iter()
        .all(|&d| packed_count(&Trip::new(d, Context::default()), catalog, "books") == Some(0.0));
    results.push(TestResult {
        name: "quantity_exclusion_only_never_packs".into(),
        passed: never,
        detail: "books (disallow-only) stays off every list".into(),
    });

    // Packing does not touch definitions
    let all = pack_all(&Trip::new(14, Context::new(-10, 110)), catalog);
    results.push(TestResult {
        name: "quantity_definitions_untouched".into(),
        passed: all.len() == catalog.len() && catalog.iter().all(|i| i.count() == 0.0),
        detail: format!("{} snapshots, definitions still unpacked", all.len()),
    });

    results
}

// ── 4. Property rules ───────────────────────────────────────────────────

fn validate_property_rules() -> Vec<TestResult> {
    println!("--- Property Rules ---");
    let mut results = Vec::new();

    let none: [&str; 0] = [];
    let ctx = Context::new(0, 100)
        .with("camping", true)
        .with("car", true)
        .with("winter", false);

    results.push(TestResult {
        name: "property_empty_always".into(),
        passed: PropertySet::new(none, none).satisfies(&ctx)
            && PropertySet::new(none, none).satisfies(&Context::default()),
        detail: "empty set satisfied by any context".into(),
    });

    results.push(TestResult {
        name: "property_veto".into(),
        passed: !PropertySet::new(["camping"], ["car"]).satisfies(&ctx),
        detail: "disallowed car=true vetoes allowed camping=true".into(),
    });

    results.push(TestResult {
        name: "property_false_no_veto".into(),
        passed: PropertySet::new(["camping"], ["winter"]).satisfies(&ctx),
        detail: "disallowed winter=false does not veto".into(),
    });

    results.push(TestResult {
        name: "property_no_overlap".into(),
        passed: !PropertySet::new(["beach"], ["hotel"]).satisfies(&ctx),
        detail: "no shared property → not applicable".into(),
    });

    results.push(TestResult {
        name: "property_disallow_wins".into(),
        passed: PropertySet::new(["car"], ["car"]).requirement("car") == Some(false),
        detail: "name in both lists becomes an exclusion".into(),
    });

    results
}
