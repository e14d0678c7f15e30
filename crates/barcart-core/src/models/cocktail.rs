use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of ingredient/measure slots the API exposes per drink.
pub const MAX_INGREDIENTS: usize = 15;

/// A cocktail recipe as returned by TheCocktailDB.
///
/// Only the identifier and name are guaranteed; filter endpoints return
/// id, name and thumbnail only. Fields this struct does not name (the
/// numbered ingredient/measure slots, translations, tags) are kept in
/// `extra` so a record stored as a favorite round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cocktail {
    #[serde(rename = "idDrink")]
    pub id: String,
    #[serde(rename = "strDrink")]
    pub name: String,
    #[serde(rename = "strDrinkThumb", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(rename = "strCategory", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "strAlcoholic", default, skip_serializing_if = "Option::is_none")]
    pub alcoholic: Option<String>,
    #[serde(rename = "strGlass", default, skip_serializing_if = "Option::is_none")]
    pub glass: Option<String>,
    #[serde(rename = "strInstructions", default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    pub measure: Option<String>,
}

impl Ingredient {
    /// "1 1/2 oz Tequila", or just the name when no measure is given
    pub fn display(&self) -> String {
        match self.measure.as_deref() {
            Some(measure) => format!("{} {}", measure, self.name),
            None => self.name.clone(),
        }
    }
}

impl Cocktail {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            thumbnail: None,
            category: None,
            alcoholic: None,
            glass: None,
            instructions: None,
            extra: BTreeMap::new(),
        }
    }

    /// Read a non-empty string slot from the passthrough fields.
    fn slot(&self, key: &str) -> Option<String> {
        self.extra
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Ingredient list in slot order, skipping empty slots.
    pub fn ingredients(&self) -> Vec<Ingredient> {
        (1..=MAX_INGREDIENTS)
            .filter_map(|i| {
                let name = self.slot(&format!("strIngredient{}", i))?;
                Some(Ingredient {
                    name,
                    measure: self.slot(&format!("strMeasure{}", i)),
                })
            })
            .collect()
    }

    pub fn is_alcoholic(&self) -> bool {
        self.alcoholic
            .as_deref()
            .map(|a| a.eq_ignore_ascii_case("alcoholic"))
            .unwrap_or(false)
    }

    /// Whether this record is only a filter-endpoint summary (no recipe body).
    pub fn is_summary(&self) -> bool {
        self.instructions.is_none() && self.ingredients().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARGARITA: &str = r#"{
        "idDrink": "11007",
        "strDrink": "Margarita",
        "strDrinkThumb": "https://www.thecocktaildb.com/images/media/drink/5noda61589575158.jpg",
        "strCategory": "Ordinary Drink",
        "strAlcoholic": "Alcoholic",
        "strGlass": "Cocktail glass",
        "strInstructions": "Rub the rim of the glass with the lime slice.",
        "strIngredient1": "Tequila",
        "strIngredient2": "Triple sec",
        "strIngredient3": "Lime juice",
        "strIngredient4": "Salt",
        "strIngredient5": null,
        "strMeasure1": "1 1/2 oz ",
        "strMeasure2": "1/2 oz ",
        "strMeasure3": "1 oz ",
        "strMeasure4": null,
        "strMeasure5": null,
        "strTags": "IBA,ContemporaryClassic"
    }"#;

    #[test]
    fn test_parse_full_record() {
        let c: Cocktail = serde_json::from_str(MARGARITA).expect("Failed to parse margarita JSON");
        assert_eq!(c.id, "11007");
        assert_eq!(c.name, "Margarita");
        assert_eq!(c.glass.as_deref(), Some("Cocktail glass"));
        assert!(c.is_alcoholic());
        assert!(!c.is_summary());

        let ingredients = c.ingredients();
        assert_eq!(ingredients.len(), 4);
        assert_eq!(ingredients[0].display(), "1 1/2 oz Tequila");
        assert_eq!(ingredients[3].name, "Salt");
        assert_eq!(ingredients[3].measure, None);
        assert_eq!(ingredients[3].display(), "Salt");
    }

    #[test]
    fn test_unknown_fields_survive_reserialization() {
        let c: Cocktail = serde_json::from_str(MARGARITA).expect("Failed to parse margarita JSON");
        let json = serde_json::to_string(&c).expect("Failed to serialize");
        let again: Cocktail = serde_json::from_str(&json).expect("Failed to reparse");
        assert_eq!(again, c);
        assert_eq!(
            again.extra.get("strTags").and_then(Value::as_str),
            Some("IBA,ContemporaryClassic")
        );
    }

    #[test]
    fn test_parse_filter_summary() {
        let json = r#"{"strDrink":"Mojito","strDrinkThumb":"https://x/mojito.jpg","idDrink":"11000"}"#;
        let c: Cocktail = serde_json::from_str(json).expect("Failed to parse summary");
        assert_eq!(c.id, "11000");
        assert!(c.is_summary());
        assert!(!c.is_alcoholic());
        assert!(c.ingredients().is_empty());
    }
}
