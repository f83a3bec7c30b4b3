//! Weighted multi-factor match scoring
//!
//! Each factor is a named strategy returning `Option<f32>`: `None` means the
//! factor does not apply to this (drink, profile, context) combination and
//! is excluded from the denominator; `Some(x)` contributes `x` in [0,1].
//! The final score is the mean of applicable contributions, or 0.0 when no
//! factor applies.

use super::models::{AnalysisResult, Drink, DrinkType, Profile};

/// Price/description context from a prior extraction, if any
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringContext<'a> {
    analysis: Option<&'a AnalysisResult>,
}

impl<'a> ScoringContext<'a> {
    pub fn new(analysis: Option<&'a AnalysisResult>) -> Self {
        Self { analysis }
    }

    fn price_for(&self, name: &str) -> Option<f32> {
        self.analysis.and_then(|a| a.prices.get(name).copied())
    }

    fn description_for(&self, name: &str) -> Option<&str> {
        self.analysis
            .and_then(|a| a.descriptions.get(name).map(String::as_str))
    }
}

type FactorFn = for<'a> fn(&Drink, &Profile, &ScoringContext<'a>) -> Option<f32>;

/// Scoring factors, evaluated in order
const FACTORS: &[(&str, FactorFn)] = &[
    ("type_preference", type_preference),
    ("style_preference", style_preference),
    ("budget_fit", budget_fit),
    ("dietary_restriction", dietary_restriction),
    ("flavor_preference", flavor_preference),
];

/// Compute the normalized match score for one candidate
///
/// Pure and side-effect free; always in [0,1], never NaN.
pub fn match_score(drink: &Drink, profile: &Profile, ctx: &ScoringContext<'_>) -> f32 {
    let mut score_sum = 0.0_f32;
    let mut factor_count = 0u32;

    for (_name, factor) in FACTORS {
        if let Some(contribution) = factor(drink, profile, ctx) {
            score_sum += contribution.clamp(0.0, 1.0);
            factor_count += 1;
        }
    }

    if factor_count > 0 {
        (score_sum / factor_count as f32).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Full credit when the drink's type is among the profile favorites
fn type_preference(drink: &Drink, profile: &Profile, _ctx: &ScoringContext<'_>) -> Option<f32> {
    if profile.favorite_drink_types.is_empty() {
        return None;
    }
    if profile.favorite_drink_types.contains(&drink.drink_type) {
        Some(1.0)
    } else {
        Some(0.0)
    }
}

/// Style match within the drink's type family (beer/cocktail/wine only)
///
/// Compares the declared style, or one inferred from name/description text,
/// against the profile's style list. With no style signal at all the factor
/// still counts with zero credit.
fn style_preference(drink: &Drink, profile: &Profile, _ctx: &ScoringContext<'_>) -> Option<f32> {
    let style_keywords: Vec<String> = match drink.drink_type {
        DrinkType::Beer => profile
            .favorite_beer_styles
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        DrinkType::Cocktail => profile
            .favorite_cocktail_styles
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        DrinkType::Wine => profile
            .favorite_wine_styles
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        DrinkType::Spirit | DrinkType::NonAlcoholic => return None,
    };

    if style_keywords.is_empty() {
        return None;
    }

    let mut haystack = drink.name.to_lowercase();
    if let Some(style) = &drink.style {
        haystack.push(' ');
        haystack.push_str(&style.to_lowercase());
    }
    if let Some(desc) = &drink.description {
        haystack.push(' ');
        haystack.push_str(&desc.to_lowercase());
    }

    let matched = style_keywords.iter().any(|keyword| {
        haystack.contains(keyword.as_str()) || haystack.contains(&keyword.replace('_', " "))
    });

    Some(if matched { 1.0 } else { 0.0 })
}

/// Proximity of the listed price to the profile budget
fn budget_fit(drink: &Drink, profile: &Profile, ctx: &ScoringContext<'_>) -> Option<f32> {
    let budget = profile.budget.filter(|b| *b > 0.0)?;
    let price = ctx.price_for(&drink.name)?;
    Some((1.0 - (budget - price).abs() / budget).max(0.0))
}

/// Credit when the description mentions a restriction term (e.g. "vegan")
fn dietary_restriction(drink: &Drink, profile: &Profile, ctx: &ScoringContext<'_>) -> Option<f32> {
    let restrictions = profile.dietary_restrictions.as_deref()?;
    let description = ctx.description_for(&drink.name)?.to_lowercase();

    let mentioned = restrictions
        .split(',')
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .any(|term| description.contains(&term));

    Some(if mentioned { 1.0 } else { 0.0 })
}

/// Fraction of favorite flavors the description mentions
fn flavor_preference(drink: &Drink, profile: &Profile, ctx: &ScoringContext<'_>) -> Option<f32> {
    if profile.favorite_flavors.is_empty() {
        return None;
    }
    let description = ctx.description_for(&drink.name)?.to_lowercase();

    let matched = profile
        .favorite_flavors
        .iter()
        .filter(|flavor| description.contains(flavor.as_str()))
        .count();

    Some(matched as f32 / profile.favorite_flavors.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::models::{BeerStyle, FlavorPreference};
    use uuid::Uuid;

    fn profile() -> Profile {
        Profile::new(Uuid::new_v4())
    }

    fn beer(name: &str) -> Drink {
        Drink::candidate(name, DrinkType::Beer)
    }

    #[test]
    fn test_zero_applicable_factors_scores_zero() {
        let drink = beer("Mystery Brew");
        let score = match_score(&drink, &profile(), &ScoringContext::default());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_type_preference_full_credit() {
        let mut p = profile();
        p.favorite_drink_types = vec![DrinkType::Beer];

        let score = match_score(&beer("Pale Ale"), &p, &ScoringContext::default());
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_type_mismatch_counts_zero_credit() {
        let mut p = profile();
        p.favorite_drink_types = vec![DrinkType::Wine];

        // The only applicable factor contributes 0.0, so the score is 0.0
        let score = match_score(&beer("Pale Ale"), &p, &ScoringContext::default());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_budget_factor_worked_example() {
        // budget=10, price=12 -> max(0, 1 - 2/10) = 0.8, sole factor
        let mut p = profile();
        p.budget = Some(10.0);

        let mut analysis = AnalysisResult::from_drinks(vec![]);
        analysis.prices.insert("Old Fashioned".to_string(), 12.0);

        let drink = Drink::candidate("Old Fashioned", DrinkType::Cocktail);
        let score = match_score(&drink, &p, &ScoringContext::new(Some(&analysis)));
        assert!((score - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_budget_factor_floors_at_zero() {
        let mut p = profile();
        p.budget = Some(5.0);

        let mut analysis = AnalysisResult::from_drinks(vec![]);
        analysis.prices.insert("Reserve Pour".to_string(), 40.0);

        let drink = Drink::candidate("Reserve Pour", DrinkType::Wine);
        let score = match_score(&drink, &p, &ScoringContext::new(Some(&analysis)));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_style_match_from_name() {
        let mut p = profile();
        p.favorite_beer_styles = vec![BeerStyle::Stout];

        let score = match_score(&beer("Dry Irish Stout"), &p, &ScoringContext::default());
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_style_list_counts_without_signal() {
        // A style list with no matching signal drags the average down
        let mut p = profile();
        p.favorite_drink_types = vec![DrinkType::Beer];
        p.favorite_beer_styles = vec![BeerStyle::Ipa];

        let score = match_score(&beer("House Draft"), &p, &ScoringContext::default());
        assert!((score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_multiword_style_keyword() {
        let mut p = profile();
        p.favorite_beer_styles = vec![BeerStyle::PaleAle];

        let score = match_score(&beer("Citrus Pale Ale"), &p, &ScoringContext::default());
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_flavor_fraction() {
        let mut p = profile();
        p.favorite_flavors = vec![FlavorPreference::Sweet, FlavorPreference::Sour];

        let mut analysis = AnalysisResult::from_drinks(vec![]);
        analysis.descriptions.insert(
            "Cherry Gose".to_string(),
            "A sour wheat beer with cherry".to_string(),
        );

        let drink = beer("Cherry Gose");
        let score = match_score(&drink, &p, &ScoringContext::new(Some(&analysis)));
        assert!((score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_dietary_mention_credits() {
        let mut p = profile();
        p.dietary_restrictions = Some("vegan, gluten-free".to_string());

        let mut analysis = AnalysisResult::from_drinks(vec![]);
        analysis.descriptions.insert(
            "Garden Spritz".to_string(),
            "Vegan aperitif with botanicals".to_string(),
        );

        let drink = Drink::candidate("Garden Spritz", DrinkType::Cocktail);
        let score = match_score(&drink, &p, &ScoringContext::new(Some(&analysis)));
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_score_always_in_unit_interval() {
        let mut p = profile();
        p.favorite_drink_types = vec![DrinkType::Beer, DrinkType::Wine];
        p.favorite_beer_styles = vec![BeerStyle::Lager];
        p.favorite_flavors = vec![FlavorPreference::Bitter];
        p.dietary_restrictions = Some("vegan".to_string());
        p.budget = Some(8.0);

        let mut analysis = AnalysisResult::from_drinks(vec![]);
        analysis.prices.insert("Helles Lager".to_string(), 7.0);
        analysis.descriptions.insert(
            "Helles Lager".to_string(),
            "Crisp, lightly bitter, vegan-friendly".to_string(),
        );

        let drink = beer("Helles Lager");
        let score = match_score(&drink, &p, &ScoringContext::new(Some(&analysis)));
        assert!((0.0..=1.0).contains(&score));
        assert!(score.is_finite());
    }
}
