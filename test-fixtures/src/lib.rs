//! Outcome builders and scenario fixtures shared by tests across the workspace.
//!
//! Streams are written as category strings (`"AABAB"`) and expanded into
//! well-formed outcomes one second apart, starting at a fixed base instant.

use std::path::PathBuf;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use augur_core::{Category, Outcome};

/// Fixed start of every generated stream.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// A representative value inside the category's band.
pub fn value_for(category: Category) -> i64 {
    match category {
        Category::A => 3,
        Category::B => 10,
        Category::C => 0,
    }
}

/// One outcome of `category` at `timestamp`.
pub fn outcome_at(category: Category, timestamp: DateTime<Utc>) -> Outcome {
    Outcome::new(value_for(category), category, timestamp)
        .unwrap_or_else(|e| panic!("fixture outcome invalid: {e}"))
}

/// One outcome of `category` at [`base_time`].
pub fn outcome(category: Category) -> Outcome {
    outcome_at(category, base_time())
}

/// Parse `"AB C"` into categories; whitespace is ignored.
///
/// # Panics
/// Panics on any character other than A, B, C or whitespace.
pub fn categories(text: &str) -> Vec<Category> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            'A' | 'a' => Category::A,
            'B' | 'b' => Category::B,
            'C' | 'c' => Category::C,
            other => panic!("unknown category '{other}' in fixture stream"),
        })
        .collect()
}

/// Outcomes for a category string, one second apart from [`base_time`].
pub fn stream(text: &str) -> Vec<Outcome> {
    stream_from(text, base_time())
}

/// Outcomes for a category string, one second apart from `start`.
pub fn stream_from(text: &str, start: DateTime<Utc>) -> Vec<Outcome> {
    categories(text)
        .into_iter()
        .enumerate()
        .map(|(i, c)| outcome_at(c, start + Duration::seconds(i as i64)))
        .collect()
}

/// A recorded outcome stream with the values as the source reported them.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFixture {
    pub name: String,
    pub description: String,
    pub values: Vec<i64>,
}

impl ScenarioFixture {
    /// Valid outcomes one second apart. Invalid values are kept as `Err`
    /// so tests can assert how the pipeline drops them.
    pub fn outcomes(&self) -> Vec<Result<Outcome, augur_core::AugurError>> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| Outcome::from_value(*v, base_time() + Duration::seconds(i as i64)))
            .collect()
    }
}

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);
    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!("could not find test-fixtures directory from CARGO_MANIFEST_DIR={manifest_dir}");
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
}

/// Load a named scenario from `scenarios/<name>.json`.
pub fn load_scenario(name: &str) -> ScenarioFixture {
    load_fixture(&format!("scenarios/{name}.json"))
}
