//! Spell builders shared by unit tests.

use serde_json::{Value, json};

use crate::spell::{Corpus, Spell};

pub(crate) fn spell(name: &str, level: u8, components: Value) -> Spell {
    serde_json::from_value(json!({
        "name": name,
        "source": "PHB",
        "level": level,
        "components": components,
        "duration": [{ "type": "instant" }],
    }))
    .unwrap()
}

pub(crate) fn with_material(name: &str, level: u8, text: &str) -> Spell {
    spell(name, level, json!({ "v": true, "s": true, "m": { "text": text } }))
}

/// `per_level` plain spells (no material) at every level in `levels`.
pub(crate) fn plain_corpus(levels: std::ops::RangeInclusive<u8>, per_level: usize) -> Corpus {
    levels
        .flat_map(|level| {
            (0..per_level).map(move |i| spell(&format!("L{level}-{i}"), level, json!({ "v": true })))
        })
        .collect()
}
