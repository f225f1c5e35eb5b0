//! Spell records and the corpus they are drawn from.
//!
//! Records mirror the provider's JSON shape. Only the fields the rules engine
//! reads are typed; everything else is kept in `extra` maps so a corpus written
//! to the cache reads back identical to what was downloaded.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Untyped provider fields carried alongside a typed record.
pub type Extra = Map<String, Value>;

/// A single spell as published by the data provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,

    /// Short source code (e.g. `PHB`), resolved to a full name via the catalog.
    pub source: String,

    /// Spell level, 0 for cantrips.
    pub level: u8,

    pub components: Components,

    #[serde(default)]
    pub duration: Vec<DurationEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Spell {
    /// True if any duration entry requires concentration.
    pub fn requires_concentration(&self) -> bool {
        self.duration
            .iter()
            .any(|entry| entry.concentration.unwrap_or(false))
    }

    /// True if the spell can be cast as a ritual.
    pub fn is_ritual(&self) -> bool {
        self.meta
            .as_ref()
            .and_then(|meta| meta.ritual)
            .unwrap_or(false)
    }
}

/// Verbal / somatic / material presence flags.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<Material>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Components {
    pub fn verbal(&self) -> bool {
        self.v.unwrap_or(false)
    }

    pub fn somatic(&self) -> bool {
        self.s.unwrap_or(false)
    }

    /// Material component, if the spell has one.
    ///
    /// An explicit `m: false` counts as no material component.
    pub fn material(&self) -> Option<&Material> {
        match &self.m {
            Some(Material::Flag(false)) | None => None,
            Some(material) => Some(material),
        }
    }
}

/// Material component in any of the three shapes the provider emits.
///
/// ```json
/// "m": true
/// "m": "a pinch of sulfur"
/// "m": { "text": "a diamond worth 300 gp, which the spell consumes", "cost": 30000, "consume": true }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Material {
    Flag(bool),
    Text(String),
    Detailed(MaterialDetail),
}

impl Material {
    /// Descriptive text of the component, absent for a bare flag.
    pub fn description(&self) -> Option<&str> {
        match self {
            Material::Flag(_) => None,
            Material::Text(text) => Some(text),
            Material::Detailed(detail) => Some(&detail.text),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialDetail {
    pub text: String,

    #[serde(flatten)]
    pub extra: Extra,
}

/// One entry of a spell's duration list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration: Option<bool>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ritual: Option<bool>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// Ordered spell list, concatenated per source in catalog order.
///
/// Duplicates across sources are preserved.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus(Vec<Spell>);

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Spell> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Spell] {
        &self.0
    }

    /// Appends one source's records, keeping their order.
    pub fn extend_from_source(&mut self, spells: impl IntoIterator<Item = Spell>) {
        self.0.extend(spells);
    }

    /// Keeps only the spells matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&Spell) -> bool) {
        self.0.retain(keep);
    }

    /// Spells of a given level, in corpus order.
    pub fn at_level(&self, level: u8) -> impl Iterator<Item = &Spell> {
        self.0.iter().filter(move |spell| spell.level == level)
    }

    pub fn into_inner(self) -> Vec<Spell> {
        self.0
    }
}

impl From<Vec<Spell>> for Corpus {
    fn from(spells: Vec<Spell>) -> Self {
        Self(spells)
    }
}

impl FromIterator<Spell> for Corpus {
    fn from_iter<I: IntoIterator<Item = Spell>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Spell;
    type IntoIter = std::slice::Iter<'a, Spell>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
