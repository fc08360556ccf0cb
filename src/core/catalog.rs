use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Bundled city dataset, keyed by region label
const CITIES_JSON: &str = include_str!("../../data/cities.json");

/// Static, read-only catalog of recognized city names
///
/// Loaded once at first use and shared process-wide. Validation only ever
/// consults the flattened lowercase set; the region grouping is kept for
/// the health endpoint and future filtering.
#[derive(Debug)]
pub struct CityCatalog {
    /// Region label -> city names, original casing
    groups: HashMap<String, Vec<String>>,
    /// Flattened set of all names, normalized to lowercase
    all_cities: HashSet<String>,
}

impl CityCatalog {
    fn from_json(data: &str) -> Self {
        let groups: HashMap<String, Vec<String>> =
            serde_json::from_str(data).expect("bundled cities.json is malformed");

        let all_cities = groups
            .values()
            .flatten()
            .map(|city| city.to_lowercase())
            .collect();

        Self { groups, all_cities }
    }

    /// Check whether a normalized (trimmed, lowercased) name is a known city
    pub fn contains(&self, normalized: &str) -> bool {
        self.all_cities.contains(normalized)
    }

    /// Total number of distinct city names
    pub fn len(&self) -> usize {
        self.all_cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_cities.is_empty()
    }

    /// Number of region groups in the dataset
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// Process-wide catalog instance
pub static CITY_CATALOG: Lazy<CityCatalog> = Lazy::new(|| {
    let catalog = CityCatalog::from_json(CITIES_JSON);
    tracing::info!(
        "City catalog loaded: {} cities in {} groups",
        catalog.len(),
        catalog.group_count()
    );
    catalog
});
