//! One-line text rendering of a spell.
//!
//! ```text
//! 3 | Fireball                   | s, v, m
//! 2 | Augury                     | (R), s, v, m (specially marked sticks, bones, or similar tokens worth at least 25 gp)
//! ```
//!
//! Only the object form of a material component carries its text into the
//! line; flags and plain strings render as a bare `m`.

use crate::spell::{Material, Spell};

/// Column width for spell names; most names fit, longer ones push the tags right.
pub const NAME_WIDTH: usize = 26;

pub const CONCENTRATION_TAG: &str = "(C)";
pub const RITUAL_TAG: &str = "(R)";

/// Renders `level | name | tags`.
pub fn format_spell(spell: &Spell) -> String {
    let line = format!(
        "{} | {:<width$} | {}",
        spell.level,
        spell.name,
        tags(spell).join(", "),
        width = NAME_WIDTH
    );
    line.trim_end().to_string()
}

/// Concentration, ritual, then somatic, verbal and material markers.
fn tags(spell: &Spell) -> Vec<String> {
    let mut tags = Vec::new();

    if spell.requires_concentration() {
        tags.push(CONCENTRATION_TAG.to_string());
    }
    if spell.is_ritual() {
        tags.push(RITUAL_TAG.to_string());
    }
    if spell.components.somatic() {
        tags.push("s".to_string());
    }
    if spell.components.verbal() {
        tags.push("v".to_string());
    }
    if let Some(material) = spell.components.material() {
        tags.push(material_tag(material));
    }

    tags
}

fn material_tag(material: &Material) -> String {
    match material {
        Material::Detailed(detail) => format!("m ({})", detail.text),
        Material::Flag(_) | Material::Text(_) => "m".to_string(),
    }
}
