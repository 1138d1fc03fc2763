//! # Catalog Models
//!
//! Wire types for the species catalog. The listing endpoint yields a
//! [`Page`] of lightweight [`Reference`]s; each reference dereferences to a
//! full [`Pokemon`] record.
//!
//! Unknown JSON fields are ignored, so the full upstream payload decodes
//! into these trimmed shapes.

use serde::{Deserialize, Serialize};

/// Stable identifier of a record
pub type PokemonId = u32;

/// Lightweight pointer to a record, returned by the listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reference {
    /// Identifying name
    pub name: String,
    /// Locator of the full record
    pub url: String,
}

impl Reference {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One listing response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    /// Total number of entries in the catalog
    #[serde(default)]
    pub count: u64,
    /// Locator of the next page, `None` once the catalog is exhausted
    #[serde(default)]
    pub next: Option<String>,
    /// References in listing order
    #[serde(default)]
    pub results: Vec<Reference>,
}

/// A named pointer into another catalog resource (type, stat, ability)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl NamedResource {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
        }
    }
}

/// Typed tag with its ordering slot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeSlot {
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// Numeric attribute with its base value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

/// Named trait, possibly hidden
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
}

/// Alternate artwork variants
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Artwork,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

/// Image locators
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sprites {
    /// Primary image
    #[serde(default)]
    pub front_default: Option<String>,
    /// Higher-quality alternates
    #[serde(default)]
    pub other: OtherSprites,
}

/// A fully-resolved species record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pokemon {
    pub id: PokemonId,
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    /// Height in decimetres
    #[serde(default)]
    pub height: u32,
    /// Weight in hectograms
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub sprites: Sprites,
}

impl Pokemon {
    /// Best available image: official artwork, falling back to the primary sprite
    pub fn artwork_url(&self) -> Option<&str> {
        self.sprites
            .other
            .official_artwork
            .front_default
            .as_deref()
            .or(self.sprites.front_default.as_deref())
    }

    pub fn height_m(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }

    /// Name with the first character upper-cased
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Type occupying the lowest slot
    pub fn primary_type(&self) -> Option<&str> {
        self.types
            .iter()
            .min_by_key(|t| t.slot)
            .map(|t| t.kind.name.as_str())
    }

    /// Type names ordered by slot
    pub fn type_names(&self) -> Vec<&str> {
        let mut types: Vec<&TypeSlot> = self.types.iter().collect();
        types.sort_by_key(|t| t.slot);
        types.into_iter().map(|t| t.kind.name.as_str()).collect()
    }

    /// Abilities that are not flagged hidden
    pub fn visible_abilities(&self) -> impl Iterator<Item = &AbilitySlot> {
        self.abilities.iter().filter(|a| !a.is_hidden)
    }

    /// Base value of a named stat
    pub fn base_stat(&self, name: &str) -> Option<u32> {
        self.stats
            .iter()
            .find(|s| s.stat.name == name)
            .map(|s| s.base_stat)
    }
}
