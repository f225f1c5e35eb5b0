//! Seeded spell draws.
//!
//! # Determinism
//!
//! The sampler owns its generator. [`DrawSeed::from_date`] hashes the ISO-8601
//! date, so every draw made on the same calendar day with the same inputs
//! yields the same spells in the same order.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::cost::CostFilter;
use crate::error::SampleError;
use crate::slots::SlotTable;
use crate::spell::{Corpus, Spell};

/// 256-bit seed for [`StdRng`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawSeed([u8; 32]);

impl DrawSeed {
    /// Seed derived from `SHA-256("YYYY-MM-DD")`.
    pub fn from_date(date: NaiveDate) -> Self {
        let digest = Sha256::digest(date.format("%Y-%m-%d").to_string().as_bytes());
        Self(digest.into())
    }

    pub fn into_rng(self) -> StdRng {
        StdRng::from_seed(self.0)
    }
}

/// Draws spells without replacement according to a slot table.
pub struct Sampler<R = StdRng> {
    rng: R,
}

impl Sampler<StdRng> {
    /// Sampler seeded for `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        Self::new(DrawSeed::from_date(date).into_rng())
    }
}

impl<R: Rng> Sampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draws `count` spells for every `(level, count)` entry of `slots`.
    ///
    /// Levels are visited in ascending order, so the output is grouped by
    /// level. Within a level the spells are distinct corpus entries in draw
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::InsufficientEligibleRecords`] if a level has
    /// fewer eligible spells than slots. Nothing is returned in that case.
    pub fn draw(
        &mut self,
        corpus: &Corpus,
        slots: &SlotTable,
        filter: CostFilter,
    ) -> Result<Vec<Spell>, SampleError> {
        let mut drawn = Vec::with_capacity(slots.total() as usize);

        for (level, count) in slots.iter() {
            let eligible: Vec<&Spell> = corpus
                .at_level(level)
                .filter(|spell| filter.admits(spell))
                .collect();
            let required = count as usize;

            if required > eligible.len() {
                return Err(SampleError::InsufficientEligibleRecords {
                    level,
                    required,
                    available: eligible.len(),
                });
            }

            drawn.extend(
                index::sample(&mut self.rng, eligible.len(), required)
                    .into_iter()
                    .map(|i| eligible[i].clone()),
            );
        }

        Ok(drawn)
    }

    /// Picks a different spell of the same level to replace `spell`.
    ///
    /// Candidates are spells whose name differs from `spell` and that pass
    /// `filter`.
    pub fn resample(
        &mut self,
        spell: &Spell,
        corpus: &Corpus,
        filter: CostFilter,
    ) -> Result<Spell, SampleError> {
        self.pick_replacement(spell, corpus, filter, |candidate| candidate.name != spell.name)
    }

    /// Replaces `drawn[position]` in place with a spell not already in `drawn`.
    ///
    /// Returns the spell that was replaced.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds.
    pub fn reroll(
        &mut self,
        drawn: &mut [Spell],
        position: usize,
        corpus: &Corpus,
        filter: CostFilter,
    ) -> Result<Spell, SampleError> {
        let replacement = self.pick_replacement(&drawn[position], corpus, filter, |candidate| {
            drawn.iter().all(|kept| kept.name != candidate.name)
        })?;
        Ok(std::mem::replace(&mut drawn[position], replacement))
    }

    fn pick_replacement(
        &mut self,
        spell: &Spell,
        corpus: &Corpus,
        filter: CostFilter,
        allowed: impl Fn(&Spell) -> bool,
    ) -> Result<Spell, SampleError> {
        let candidates: Vec<&Spell> = corpus
            .at_level(spell.level)
            .filter(|candidate| allowed(candidate) && filter.admits(candidate))
            .collect();

        if candidates.is_empty() {
            return Err(SampleError::NoReplacement {
                name: spell.name.clone(),
                level: spell.level,
            });
        }

        let pick = self.rng.random_range(0..candidates.len());
        Ok(candidates[pick].clone())
    }
}
