//! Material cost classification.
//!
//! Each spell falls into exactly one [`CostClass`] based on the text of its
//! material component:
//!
//! | Class      | Material | "worth" | "consume" | Example                    |
//! |------------|----------|---------|-----------|----------------------------|
//! | `none`     | no       | -       | -         | Catapult                   |
//! | `free`     | yes      | no      | -         | Fireball (bat guano)       |
//! | `pricey`   | yes      | yes     | no        | Chromatic Orb (50 gp gem)  |
//! | `consumed` | yes      | yes     | yes       | Ceremony (powdered silver) |

use strum::{Display, EnumIter};

use crate::spell::{Material, Spell};

/// Phrase marking a material component with a gold cost.
const COST_MARKER: &str = "worth";

/// Phrase marking a material component used up by the casting.
const CONSUME_MARKER: &str = "consume";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum CostClass {
    /// No material component at all.
    None,
    /// Material component with no stated cost.
    Free,
    /// Costly material component that survives the casting.
    Pricey,
    /// Costly material component consumed on every casting.
    Consumed,
}

/// Classifies a spell by its material component.
pub fn classify(spell: &Spell) -> CostClass {
    match spell.components.material() {
        None => CostClass::None,
        Some(material) => classify_material(material),
    }
}

/// Classifies a present material component.
///
/// A bare flag has no description and is therefore free.
pub fn classify_material(material: &Material) -> CostClass {
    match material.description() {
        Some(text) if text.contains(COST_MARKER) => {
            if text.contains(CONSUME_MARKER) {
                CostClass::Consumed
            } else {
                CostClass::Pricey
            }
        }
        _ => CostClass::Free,
    }
}

/// User-selected restriction on which cost classes may be drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum CostFilter {
    #[default]
    AcceptAll,
    /// Only spells without a costly material component.
    ExcludeAllMaterialCost,
    /// Costly components are fine as long as they are not consumed.
    ExcludeConsumedOnly,
}

impl CostFilter {
    pub fn accepts(self, class: CostClass) -> bool {
        match self {
            CostFilter::AcceptAll => true,
            CostFilter::ExcludeAllMaterialCost => {
                matches!(class, CostClass::None | CostClass::Free)
            }
            CostFilter::ExcludeConsumedOnly => class != CostClass::Consumed,
        }
    }

    /// Whether `spell` passes this filter.
    pub fn admits(self, spell: &Spell) -> bool {
        self.accepts(classify(spell))
    }
}
