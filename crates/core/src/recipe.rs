//! Recipe value objects and their text encoding.
//!
//! A recipe is persisted as a JSON document in a text column and decoded on
//! read. Decoding is lenient about a single bare ingredient object, which is
//! treated as a one-element recipe.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DomainError, DomainResult};

/// One line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Display color used by the frontend to draw the drink.
    pub color: String,
    /// Relative proportion of this ingredient (at least 1).
    pub parts: u32,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, color: impl Into<String>, parts: u32) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            parts,
        }
    }
}

/// Public projection of an ingredient: the name is withheld.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: u32,
}

impl From<&Ingredient> for ShortIngredient {
    fn from(value: &Ingredient) -> Self {
        Self {
            color: value.color.clone(),
            parts: value.parts,
        }
    }
}

/// Ordered list of ingredients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Recipe(Vec<Ingredient>);

impl Recipe {
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        Self(ingredients)
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn short(&self) -> Vec<ShortIngredient> {
        self.0.iter().map(ShortIngredient::from).collect()
    }

    /// Check per-ingredient invariants.
    pub fn validate(&self) -> DomainResult<()> {
        for (idx, ingredient) in self.0.iter().enumerate() {
            if ingredient.parts == 0 {
                return Err(DomainError::validation(format!(
                    "recipe[{idx}] ({}) must have at least one part",
                    ingredient.name
                )));
            }
        }
        Ok(())
    }

    /// Encode for storage.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode from storage.
    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl From<Vec<Ingredient>> for Recipe {
    fn from(value: Vec<Ingredient>) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for Recipe {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Many(Vec<Ingredient>),
            One(Ingredient),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::Many(ingredients) => Recipe(ingredients),
            OneOrMany::One(ingredient) => Recipe(vec![ingredient]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_sequence_of_ingredients() {
        let recipe: Recipe = serde_json::from_value(json!([
            {"name": "espresso", "color": "brown", "parts": 1},
            {"name": "milk", "color": "white", "parts": 3}
        ]))
        .unwrap();

        assert_eq!(recipe.len(), 2);
        assert_eq!(recipe.ingredients()[1], Ingredient::new("milk", "white", 3));
    }

    #[test]
    fn single_object_is_treated_as_one_element_recipe() {
        let recipe = Recipe::from_text(r#"{"name":"water","color":"blue","parts":1}"#).unwrap();
        assert_eq!(recipe, Recipe::new(vec![Ingredient::new("water", "blue", 1)]));
    }

    #[test]
    fn empty_sequence_is_a_valid_recipe() {
        let recipe = Recipe::from_text("[]").unwrap();
        assert!(recipe.is_empty());
        assert!(recipe.validate().is_ok());
    }

    #[test]
    fn entries_missing_fields_are_rejected() {
        assert!(Recipe::from_text(r#"[{"color":"blue","parts":1}]"#).is_err());
        assert!(Recipe::from_text(r#"[{"name":"water","color":"blue","parts":-1}]"#).is_err());
        assert!(Recipe::from_text(r#""water""#).is_err());
    }

    #[test]
    fn zero_parts_fail_validation() {
        let recipe = Recipe::new(vec![Ingredient::new("air", "clear", 0)]);
        assert!(matches!(recipe.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn short_projection_drops_names() {
        let recipe = Recipe::new(vec![Ingredient::new("water", "blue", 1)]);
        let value = serde_json::to_value(recipe.short()).unwrap();
        assert_eq!(value, json!([{"color": "blue", "parts": 1}]));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn ingredient() -> impl Strategy<Value = Ingredient> {
            ("[a-z ]{1,16}", "[a-z#0-9]{1,10}", 1u32..100)
                .prop_map(|(name, color, parts)| Ingredient::new(name, color, parts))
        }

        proptest! {
            /// Property: storage encoding is lossless for any well-formed recipe.
            #[test]
            fn text_encoding_is_lossless(ingredients in proptest::collection::vec(ingredient(), 0..8)) {
                let recipe = Recipe::new(ingredients);
                let text = recipe.to_text().unwrap();
                prop_assert_eq!(Recipe::from_text(&text).unwrap(), recipe);
            }
        }
    }
}
