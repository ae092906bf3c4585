//! Static service catalog: categories and cities.
//!
//! This is reference data for the interpreter and directory seeding, not
//! behavior. Category ids are the stable keys stored on providers and
//! bookings; display names are presentation-only.

/// A service category the marketplace offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Stable id stored on provider and booking records.
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Keywords the query interpreter scores free text against.
    pub keywords: &'static [&'static str],
}

pub const CATEGORIES: &[Category] = &[
    Category {
        id: "plumbing",
        name: "Plumbing",
        description: "Leak repairs, pipe fitting, and installation.",
        keywords: &[
            "plumber", "plumbing", "leak", "pipe", "tap", "sink", "water", "drain", "faucet",
            "flush", "toilet",
        ],
    },
    Category {
        id: "electrical",
        name: "Electrical",
        description: "Wiring, appliance repair, and maintenance.",
        keywords: &[
            "electric", "wiring", "light", "fan", "switch", "ups", "generator", "voltage",
            "circuit", "power", "bulb",
        ],
    },
    Category {
        id: "ac_repair",
        name: "AC Repair",
        description: "AC servicing, gas refill, and installation.",
        keywords: &[
            "ac", "air cond", "cooling", "service", "gas", "install", "split", "inverter",
            "maintenance", "heat", "vent",
        ],
    },
    Category {
        id: "cleaning",
        name: "Home Cleaning",
        description: "Deep cleaning, sofa cleaning, and janitorial services.",
        keywords: &[
            "clean", "dust", "maid", "sweep", "wash", "housekeeping", "janitor", "sofa",
            "carpet", "deep",
        ],
    },
    Category {
        id: "auto_mechanic",
        name: "Auto Mechanic",
        description: "Car repair, oil change, and diagnostics.",
        keywords: &[
            "car", "mechanic", "auto", "repair", "oil", "engine", "brake", "tuning", "tyre",
            "tire", "vehicle",
        ],
    },
    Category {
        id: "home_tutor",
        name: "Home Tutor",
        description: "K-12 tuition, O/A Levels, and test prep.",
        keywords: &[
            "tutor", "teach", "study", "math", "science", "school", "grade", "exam", "physics",
            "chemistry", "english",
        ],
    },
];

pub const CITIES: &[&str] = &["Karachi", "Lahore", "Islamabad", "Rawalpindi", "Faisalabad"];

/// Well-known neighbourhoods checked when no city name appears in a query.
pub const COMMON_AREAS: &[&str] = &["gulberg", "clifton", "dha", "bahria", "f-10", "johar"];

/// Look a category up by its stable id.
pub fn category_by_id(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ids_unique() {
        for (i, a) in CATEGORIES.iter().enumerate() {
            for b in &CATEGORIES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_lookup_by_id() {
        assert_eq!(category_by_id("ac_repair").unwrap().name, "AC Repair");
        assert!(category_by_id("locksmith").is_none());
    }

    #[test]
    fn test_every_category_has_keywords() {
        for c in CATEGORIES {
            assert!(!c.keywords.is_empty(), "{} has no keywords", c.id);
        }
    }
}
