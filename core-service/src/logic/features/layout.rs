//! Feature Layout - Encoded Vocabulary Definition
//!
//! **This file controls which columns the encoder can produce**
//!
//! Every categorical value maps to a fixed column name `<Field>_<Value>`,
//! spelled exactly as the model was trained with (spaces included).
//! The numeric `Age` column passes through under its own name.
//!
//! The model decides the final order through its [`ColumnSchema`];
//! this layout only fixes the vocabulary.
//!
//! [`ColumnSchema`]: crate::logic::model::ColumnSchema

use std::fmt;
use std::str::FromStr;

use crc32fast::Hasher;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// ENCODED VOCABULARY (Authoritative source)
// ============================================================================

/// Numeric column name
pub const AGE_COLUMN: &str = "Age";

/// Every column the encoder can emit, in encoding order
pub const ENCODED_LAYOUT: &[&str] = &[
    // === Numeric (0) ===
    "Age",

    // === Weather (1-4) ===
    "Weather_Clear",
    "Weather_Rainy",
    "Weather_Foggy",
    "Weather_Snowy",

    // === Vehicle type (5-8) ===
    "Vehicle_Type_Car",
    "Vehicle_Type_Bike",
    "Vehicle_Type_Bus",
    "Vehicle_Type_Truck",

    // === Road type (9-11) ===
    "Road_Type_Highway",
    "Road_Type_City Road",
    "Road_Type_Rural Road",
];

/// Total number of encoded columns
/// IMPORTANT: Must match ENCODED_LAYOUT.len()!
pub const ENCODED_COUNT: usize = 12;

/// Check whether the encoder can produce a column with this name
pub fn is_encoded_column(name: &str) -> bool {
    ENCODED_LAYOUT.iter().any(|&n| n == name)
}

// ============================================================================
// CATEGORICAL DOMAINS
// ============================================================================

/// Error when a categorical value is not part of its domain
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} value: {value:?}")]
pub struct UnknownCategory {
    pub field: &'static str,
    pub value: String,
}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $( $variant:ident => ($label:literal, $column:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Raw field name, used as the indicator column prefix
            pub const FIELD: &'static str = $field;

            /// All values, in form display order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Human label (also the form/JSON value)
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// One-hot indicator column for this value
            pub fn column(self) -> &'static str {
                match self {
                    $($name::$variant => $column,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownCategory;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(UnknownCategory {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }

        // Parsed through FromStr so rejections name the field and value
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                value.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

categorical! {
    /// Weather condition at the time of the accident
    Weather, field = "Weather" {
        Clear => ("Clear", "Weather_Clear"),
        Rainy => ("Rainy", "Weather_Rainy"),
        Foggy => ("Foggy", "Weather_Foggy"),
        Snowy => ("Snowy", "Weather_Snowy"),
    }
}

categorical! {
    /// Vehicle driven by the casualty
    VehicleType, field = "Vehicle_Type" {
        Car => ("Car", "Vehicle_Type_Car"),
        Bike => ("Bike", "Vehicle_Type_Bike"),
        Bus => ("Bus", "Vehicle_Type_Bus"),
        Truck => ("Truck", "Vehicle_Type_Truck"),
    }
}

categorical! {
    /// Road category
    RoadType, field = "Road_Type" {
        Highway => ("Highway", "Road_Type_Highway"),
        CityRoad => ("City Road", "Road_Type_City Road"),
        RuralRoad => ("Rural Road", "Road_Type_Rural Road"),
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of an ordered column list
/// Used to spot schema changes in logs and status output
pub fn compute_columns_hash<S: AsRef<str>>(columns: &[S]) -> u32 {
    let mut hasher = Hasher::new();

    for name in columns {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get vocabulary index by name (O(n) but columns are few)
pub fn feature_index(name: &str) -> Option<usize> {
    ENCODED_LAYOUT.iter().position(|&n| n == name)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_count() {
        assert_eq!(ENCODED_LAYOUT.len(), ENCODED_COUNT);
        assert_eq!(
            1 + Weather::ALL.len() + VehicleType::ALL.len() + RoadType::ALL.len(),
            ENCODED_COUNT
        );
    }

    #[test]
    fn test_every_category_column_is_in_layout() {
        for w in Weather::ALL {
            assert!(is_encoded_column(w.column()), "{}", w.column());
        }
        for v in VehicleType::ALL {
            assert!(is_encoded_column(v.column()), "{}", v.column());
        }
        for r in RoadType::ALL {
            assert!(is_encoded_column(r.column()), "{}", r.column());
        }
    }

    #[test]
    fn test_column_naming_keeps_spaces() {
        assert_eq!(RoadType::CityRoad.column(), "Road_Type_City Road");
        assert_eq!(
            RoadType::RuralRoad.column(),
            format!("{}_{}", RoadType::FIELD, RoadType::RuralRoad.label())
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Rainy".parse::<Weather>(), Ok(Weather::Rainy));
        assert_eq!("City Road".parse::<RoadType>(), Ok(RoadType::CityRoad));

        let err = "Boat".parse::<VehicleType>().unwrap_err();
        assert_eq!(err.field, "Vehicle_Type");
        assert_eq!(err.value, "Boat");
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&RoadType::RuralRoad).unwrap();
        assert_eq!(json, "\"Rural Road\"");

        let parsed: VehicleType = serde_json::from_str("\"Truck\"").unwrap();
        assert_eq!(parsed, VehicleType::Truck);

        let err = serde_json::from_str::<VehicleType>("\"Boat\"").unwrap_err();
        assert!(err.to_string().contains("unknown Vehicle_Type value: \"Boat\""), "{}", err);
    }

    #[test]
    fn test_columns_hash() {
        let hash1 = compute_columns_hash(ENCODED_LAYOUT);
        let hash2 = compute_columns_hash(ENCODED_LAYOUT);
        assert_eq!(hash1, hash2);
        assert_ne!(hash1, 0);

        // Order matters
        let swapped = ["Weather_Clear", "Age"];
        let original = ["Age", "Weather_Clear"];
        assert_ne!(compute_columns_hash(&swapped), compute_columns_hash(&original));
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("Age"), Some(0));
        assert_eq!(feature_index("Road_Type_Rural Road"), Some(11));
        assert_eq!(feature_index("Road_Type_Rural_Road"), None);
        assert_eq!(feature_index("Vehicle_Type_Car"), Some(5));
    }
}
