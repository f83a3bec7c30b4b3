//! Domain models for menu analysis

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Drink category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrinkType {
    Beer,
    Cocktail,
    Spirit,
    Wine,
    #[serde(rename = "non-alcoholic")]
    NonAlcoholic,
}

impl DrinkType {
    pub const ALL: [DrinkType; 5] = [
        DrinkType::Beer,
        DrinkType::Cocktail,
        DrinkType::Spirit,
        DrinkType::Wine,
        DrinkType::NonAlcoholic,
    ];

    /// Lowercase keyword used by the fallback extractor
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beer => "beer",
            Self::Cocktail => "cocktail",
            Self::Spirit => "spirit",
            Self::Wine => "wine",
            Self::NonAlcoholic => "non-alcoholic",
        }
    }
}

/// Flavor preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlavorPreference {
    Sweet,
    Bitter,
    Sour,
    Spicy,
    Umami,
    Salty,
}

impl FlavorPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sweet => "sweet",
            Self::Bitter => "bitter",
            Self::Sour => "sour",
            Self::Spicy => "spicy",
            Self::Umami => "umami",
            Self::Salty => "salty",
        }
    }
}

/// Beer style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeerStyle {
    Ipa,
    Pilsner,
    Stout,
    Porter,
    Lager,
    Wheat,
    Sour,
    PaleAle,
}

impl BeerStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ipa => "ipa",
            Self::Pilsner => "pilsner",
            Self::Stout => "stout",
            Self::Porter => "porter",
            Self::Lager => "lager",
            Self::Wheat => "wheat",
            Self::Sour => "sour",
            Self::PaleAle => "pale_ale",
        }
    }
}

/// Cocktail style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CocktailStyle {
    Martini,
    Margarita,
    OldFashioned,
    Mojito,
    Negroni,
    Sour,
    Tiki,
    Spritz,
}

impl CocktailStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Martini => "martini",
            Self::Margarita => "margarita",
            Self::OldFashioned => "old_fashioned",
            Self::Mojito => "mojito",
            Self::Negroni => "negroni",
            Self::Sour => "sour",
            Self::Tiki => "tiki",
            Self::Spritz => "spritz",
        }
    }
}

/// Wine style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WineStyle {
    Red,
    White,
    Rose,
    Sparkling,
    Dessert,
    Fortified,
}

impl WineStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::White => "white",
            Self::Rose => "rose",
            Self::Sparkling => "sparkling",
            Self::Dessert => "dessert",
            Self::Fortified => "fortified",
        }
    }
}

/// Location category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Restaurant,
    Brewery,
    Taproom,
    Bar,
    Other,
}

/// A drink candidate produced by extraction, or a persisted drink record
///
/// Immutable once scored; only the persistence layer retires records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drink {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub drink_type: DrinkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alcohol_content: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ibu: Option<u32>,
    #[serde(default)]
    pub is_seasonal: bool,
    #[serde(default)]
    pub is_exclusive: bool,
}

impl Drink {
    /// Create a bare candidate with generated identity
    pub fn candidate(name: impl Into<String>, drink_type: DrinkType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            drink_type,
            style: None,
            brand: None,
            description: None,
            alcohol_content: None,
            ibu: None,
            is_seasonal: false,
            is_exclusive: false,
        }
    }
}

/// User preference profile, read-only input to scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    #[serde(default)]
    pub favorite_drink_types: Vec<DrinkType>,
    #[serde(default)]
    pub favorite_flavors: Vec<FlavorPreference>,
    #[serde(default)]
    pub favorite_beer_styles: Vec<BeerStyle>,
    #[serde(default)]
    pub favorite_cocktail_styles: Vec<CocktailStyle>,
    #[serde(default)]
    pub favorite_wine_styles: Vec<WineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f32>,
}

impl Profile {
    /// Empty profile for a user (no preferences set)
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            favorite_drink_types: Vec::new(),
            favorite_flavors: Vec::new(),
            favorite_beer_styles: Vec::new(),
            favorite_cocktail_styles: Vec::new(),
            favorite_wine_styles: Vec::new(),
            dietary_restrictions: None,
            budget: None,
        }
    }
}

/// Venue details supplied alongside a menu photo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// AI-generated recommendation annotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub drink_name: String,
    pub match_score: f32,
    pub reasoning: String,
}

/// Structured extraction output for one menu
///
/// Produced once per distinct menu text (or per location within the cache
/// window) and treated as a cache value thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub drinks: Vec<Drink>,
    #[serde(default)]
    pub prices: HashMap<String, f32>,
    #[serde(default)]
    pub descriptions: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Recommendation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationInfo>,
}

impl AnalysisResult {
    /// Wrap fallback-extracted candidates with no price/description context
    pub fn from_drinks(drinks: Vec<Drink>) -> Self {
        Self {
            drinks,
            prices: HashMap::new(),
            descriptions: HashMap::new(),
            recommendations: None,
            location: None,
        }
    }
}

/// A drink with its computed match score
#[derive(Debug, Clone, Serialize)]
pub struct ScoredDrink {
    pub drink: Drink,
    pub score: f32,
}

/// Ranked partition of scored candidates
#[derive(Debug, Clone, Default, Serialize)]
pub struct MenuMatches {
    pub matches: Vec<Drink>,
    pub suggestions: Vec<Drink>,
}

/// Persisted venue record, deduplicated by (name, type)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub location_type: LocationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Menu snapshot for a location
///
/// At most one menu per location is active at a time; the store's upsert
/// enforces this on every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub id: Uuid,
    pub location_id: Uuid,
    pub analysis: AnalysisResult,
    pub is_active: bool,
    pub valid_from: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<DateTime<Utc>>,
}

/// Fire-and-forget analytics event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub user_id: Uuid,
    pub category: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(user_id: Uuid, category: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            user_id,
            category: category.into(),
            action: action.into(),
            label: None,
            metadata: None,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drink_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&DrinkType::NonAlcoholic).unwrap(),
            "\"non-alcoholic\""
        );
        assert_eq!(serde_json::to_string(&DrinkType::Beer).unwrap(), "\"beer\"");

        let parsed: DrinkType = serde_json::from_str("\"non-alcoholic\"").unwrap();
        assert_eq!(parsed, DrinkType::NonAlcoholic);
    }

    #[test]
    fn test_candidate_defaults() {
        let drink = Drink::candidate("Guinness Stout", DrinkType::Beer);
        assert!(drink.style.is_none());
        assert!(drink.description.is_none());
        assert!(!drink.is_seasonal);
        assert!(!drink.is_exclusive);
    }

    #[test]
    fn test_analysis_result_roundtrip() {
        let mut result = AnalysisResult::from_drinks(vec![Drink::candidate(
            "House Margarita",
            DrinkType::Cocktail,
        )]);
        result.prices.insert("House Margarita".to_string(), 12.0);

        let json = serde_json::to_string(&result).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.drinks.len(), 1);
        assert_eq!(parsed.prices["House Margarita"], 12.0);
        assert!(parsed.recommendations.is_none());
    }

    #[test]
    fn test_style_enum_wire_format() {
        assert_eq!(
            serde_json::to_string(&BeerStyle::PaleAle).unwrap(),
            "\"pale_ale\""
        );
        assert_eq!(
            serde_json::to_string(&CocktailStyle::OldFashioned).unwrap(),
            "\"old_fashioned\""
        );
    }
}
