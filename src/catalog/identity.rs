use crate::error::{IndexKind, SimError, SimResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Versioned key for a duck catalog document (e.g., `duck_catalog_v1`).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogKey(pub String);

/// Name of a behavior implementation as written in catalog files.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImplementationName(pub String);

impl ImplementationName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImplementationName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The fixed set of things a duck can do.
///
/// Declaration order is display order; `Ord` follows it so maps keyed by
/// category iterate Quack, Swim, Fly.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum BehaviorCategory {
    Quack,
    Swim,
    Fly,
}

impl BehaviorCategory {
    pub const ALL: [BehaviorCategory; 3] = [
        BehaviorCategory::Quack,
        BehaviorCategory::Swim,
        BehaviorCategory::Fly,
    ];

    /// Categories in display order.
    pub fn all() -> &'static [BehaviorCategory] {
        &Self::ALL
    }

    /// Category at a display position.
    pub fn at(index: usize) -> SimResult<Self> {
        Self::ALL.get(index).copied().ok_or(SimError::OutOfRange {
            kind: IndexKind::Category,
            index,
            len: Self::ALL.len(),
        })
    }

    /// Accepts either a display position or a category name.
    pub fn resolve(token: &str) -> SimResult<Self> {
        match token.trim().parse::<usize>() {
            Ok(index) => Self::at(index),
            Err(_) => token.parse(),
        }
    }

    pub fn index(self) -> usize {
        match self {
            BehaviorCategory::Quack => 0,
            BehaviorCategory::Swim => 1,
            BehaviorCategory::Fly => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorCategory::Quack => "quack",
            BehaviorCategory::Swim => "swim",
            BehaviorCategory::Fly => "fly",
        }
    }

    /// Human-facing title used for list rows.
    pub fn title(self) -> &'static str {
        match self {
            BehaviorCategory::Quack => "Quack",
            BehaviorCategory::Swim => "Swim",
            BehaviorCategory::Fly => "Fly",
        }
    }
}

impl fmt::Display for BehaviorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BehaviorCategory {
    type Err = SimError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SimError::UnknownCategory {
                name: trimmed.to_string(),
            })
    }
}

impl Serialize for BehaviorCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BehaviorCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn categories_keep_display_order() {
        let titles: Vec<_> = BehaviorCategory::all().iter().map(|c| c.title()).collect();
        assert_eq!(titles, ["Quack", "Swim", "Fly"]);
        for (position, category) in BehaviorCategory::all().iter().enumerate() {
            assert_eq!(category.index(), position);
            assert_eq!(BehaviorCategory::at(position).unwrap(), *category);
        }
    }

    #[test]
    fn category_index_past_end_is_out_of_range() {
        let err = BehaviorCategory::at(3).unwrap_err();
        assert_eq!(
            err,
            SimError::OutOfRange {
                kind: IndexKind::Category,
                index: 3,
                len: 3
            }
        );
    }

    #[test]
    fn resolve_accepts_names_and_positions() {
        assert_eq!(BehaviorCategory::resolve("2").unwrap(), BehaviorCategory::Fly);
        assert_eq!(BehaviorCategory::resolve("Swim").unwrap(), BehaviorCategory::Swim);
        assert!(matches!(
            BehaviorCategory::resolve("waddle"),
            Err(SimError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn category_serde_uses_wire_names() {
        let json = serde_json::to_string(&BehaviorCategory::Fly).unwrap();
        assert_eq!(json, "\"fly\"");
        let back: BehaviorCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BehaviorCategory::Fly);
        assert!(serde_json::from_str::<BehaviorCategory>("\"dive\"").is_err());
    }

    #[test]
    fn category_keyed_maps_round_trip() {
        let mut map = BTreeMap::new();
        map.insert(BehaviorCategory::Fly, ImplementationName::from("rocket_powered"));
        map.insert(BehaviorCategory::Quack, ImplementationName::from("squeak"));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"quack":"squeak","fly":"rocket_powered"}"#);
        let back: BTreeMap<BehaviorCategory, ImplementationName> =
            serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
