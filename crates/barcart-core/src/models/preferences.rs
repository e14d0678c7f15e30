use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Declares a preference enum whose serialized form is its display literal.
macro_rules! preference_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $lit:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $lit)]
                $variant,
            )+
        }

        impl $name {
            /// All options, in the order the onboarding screen lists them.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Field name used in validation errors.
            pub const FIELD: &'static str = $field;

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $lit,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($lit => Ok($name::$variant),)+
                    other => Err(StoreError::Validation {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

preference_enum!(
    /// How strong the user likes their drinks
    DrinkStrength, "drink strength" {
        Light => "Light",
        Medium => "Medium",
        Strong => "Strong",
    }
);

preference_enum!(
    Sweetness, "sweetness" {
        NotSweet => "Not Sweet",
        SlightlySweet => "Slightly Sweet",
        Sweet => "Sweet",
        VerySweet => "Very Sweet",
    }
);

preference_enum!(
    /// Preferred base spirit
    BaseLiquor, "base liquor" {
        Vodka => "Vodka",
        Whiskey => "Whiskey",
        Rum => "Rum",
        Gin => "Gin",
        Tequila => "Tequila",
        Brandy => "Brandy",
    }
);

preference_enum!(
    Mood, "mood" {
        Relaxed => "Relaxed",
        Energetic => "Energetic",
        Social => "Social",
        Romantic => "Romantic",
        Adventurous => "Adventurous",
    }
);

/// The user's taste profile, captured once during onboarding and
/// overwritten whenever it is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub drink_strength: DrinkStrength,
    pub sweetness: Sweetness,
    pub base_liquor: BaseLiquor,
    pub mood: Mood,
}

/// Raw onboarding selection, one literal per question.
///
/// Empty strings mean the question has not been answered yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSelection {
    pub drink_strength: String,
    pub sweetness: String,
    pub base_liquor: String,
    pub mood: String,
}

impl PreferenceSelection {
    pub fn new(
        drink_strength: impl Into<String>,
        sweetness: impl Into<String>,
        base_liquor: impl Into<String>,
        mood: impl Into<String>,
    ) -> Self {
        Self {
            drink_strength: drink_strength.into(),
            sweetness: sweetness.into(),
            base_liquor: base_liquor.into(),
            mood: mood.into(),
        }
    }

    /// Every question has an answer (the onboarding "Continue" gate).
    pub fn is_complete(&self) -> bool {
        [&self.drink_strength, &self.sweetness, &self.base_liquor, &self.mood]
            .iter()
            .all(|v| !v.is_empty())
    }

    /// Validate every field, failing on the first unrecognized literal.
    pub fn validate(&self) -> StoreResult<UserPreferences> {
        Ok(UserPreferences {
            drink_strength: self.drink_strength.parse()?,
            sweetness: self.sweetness.parse()?,
            base_liquor: self.base_liquor.parse()?,
            mood: self.mood.parse()?,
        })
    }
}

impl From<UserPreferences> for PreferenceSelection {
    fn from(prefs: UserPreferences) -> Self {
        PreferenceSelection::new(
            prefs.drink_strength.as_str(),
            prefs.sweetness.as_str(),
            prefs.base_liquor.as_str(),
            prefs.mood.as_str(),
        )
    }
}
