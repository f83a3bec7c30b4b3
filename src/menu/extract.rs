//! Keyword-based fallback extraction for when AI analysis is unavailable

use super::models::{Drink, DrinkType};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Brand lexicon scanned as case-insensitive substrings
const COMMON_BRANDS: [&str; 10] = [
    "Heineken",
    "Guinness",
    "Stella Artois",
    "Corona",
    "Budweiser",
    "Jack Daniels",
    "Absolut",
    "Grey Goose",
    "Bacardi",
    "Bombay Sapphire",
];

/// Matches "5.2%", "5.2 %", "5.2 ABV"
static ABV_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+\.?\d*)(?:\s*%|\s*ABV)").expect("valid ABV pattern"));

/// Extract drink candidates from raw menu text
///
/// Each line is scanned against every drink-type keyword; a line matching
/// several keywords emits one candidate per keyword. Lines with no keyword
/// contribute nothing and raise no error.
pub fn extract_drinks(text: &str) -> Vec<Drink> {
    let mut drinks = Vec::new();

    for line in text.lines() {
        let lower_line = line.to_lowercase();

        for drink_type in DrinkType::ALL {
            if !lower_line.contains(drink_type.as_str()) {
                continue;
            }

            let mut drink = Drink::candidate(line.trim(), drink_type);
            drink.brand = extract_brand(line);
            drink.alcohol_content = extract_alcohol_content(line);
            drinks.push(drink);
        }
    }

    debug!(candidates = drinks.len(), "fallback extraction complete");
    drinks
}

/// First brand-lexicon entry found as a case-insensitive substring
fn extract_brand(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    COMMON_BRANDS
        .iter()
        .find(|brand| lower.contains(&brand.to_lowercase()))
        .map(|brand| brand.to_string())
}

/// First decimal followed by `%` or `ABV`
fn extract_alcohol_content(text: &str) -> Option<f32> {
    ABV_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
