//! Deterministic spell rules shared by the catalog and the CLI.
//!
//! `spellbook-core` holds everything that does not touch the network or disk:
//! - [`spell`] defines the record model and the [`Corpus`]
//! - [`cost`] classifies material components into [`CostClass`]es
//! - [`slots`] computes the per-level [`SlotTable`] for a character level
//! - [`sample`] draws reproducible samples with a date-seeded [`Sampler`]
//! - [`format`] renders a spell to a single line of text
pub mod cost;
pub mod error;
pub mod format;
pub mod sample;
pub mod slots;
pub mod spell;

#[cfg(test)]
mod fixtures;

pub use cost::{CostClass, CostFilter, classify, classify_material};
pub use error::SampleError;
pub use format::format_spell;
pub use sample::{DrawSeed, Sampler};
pub use slots::{SlotTable, slot_table};
pub use spell::{Components, Corpus, DurationEntry, Material, MaterialDetail, Meta, Spell};
