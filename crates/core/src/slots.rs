//! Spell slot table by character level.
//!
//! The progression follows the full-caster table (spells known plus cantrips)
//! with its irregular breakpoints spelled out rule by rule. Every rule is
//! applied independently for each level up to the character level:
//!
//! - `lvl <= 11` or `lvl` in {13, 15, 17}: +1 at level `ceil(lvl / 2)`
//! - `lvl >= 18`: +1 at level `lvl - 13`
//! - `lvl` in {1, 5}: another +1 at level `ceil(lvl / 2)`
//! - `lvl == 9`: +1 at level 4
//! - `lvl == 3`: +1 at levels 1 and 2
//! - `lvl` in {4, 10}: +1 cantrip

use std::collections::BTreeMap;

/// Cantrips available before any character level is applied.
pub const BASE_CANTRIPS: u32 = 4;

/// Number of spells to draw at each spell level.
///
/// Keys are ordered ascending; every stored count is at least one. A missing
/// level means no slots at that level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotTable(BTreeMap<u8, u32>);

impl SlotTable {
    /// Slot count at `level`, zero when absent.
    pub fn get(&self, level: u8) -> u32 {
        self.0.get(&level).copied().unwrap_or(0)
    }

    /// `(spell level, count)` pairs in ascending level order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.0.iter().map(|(&level, &count)| (level, count))
    }

    pub fn levels(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.keys().copied()
    }

    /// Total number of spells across all levels.
    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn increment(&mut self, level: u8) {
        *self.0.entry(level).or_insert(0) += 1;
    }
}

impl From<SlotTable> for BTreeMap<u8, u32> {
    fn from(table: SlotTable) -> Self {
        table.0
    }
}

/// Zero counts are dropped so the table keeps its invariant.
impl FromIterator<(u8, u32)> for SlotTable {
    fn from_iter<I: IntoIterator<Item = (u8, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|&(_, count)| count > 0).collect())
    }
}

/// Builds the slot table for a character of `character_level`.
pub fn slot_table(character_level: u8) -> SlotTable {
    let mut table = SlotTable::default();
    table.0.insert(0, BASE_CANTRIPS);

    for lvl in 1..=character_level {
        let half = lvl.div_ceil(2);

        if lvl <= 11 || matches!(lvl, 13 | 15 | 17) {
            table.increment(half);
        }
        if lvl >= 18 {
            table.increment(lvl - 13);
        }
        if matches!(lvl, 1 | 5) {
            table.increment(half);
        }
        if lvl == 9 {
            table.increment(4);
        }
        if lvl == 3 {
            table.increment(1);
            table.increment(2);
        }
        if matches!(lvl, 4 | 10) {
            table.increment(0);
        }
    }

    table.0.retain(|_, count| *count > 0);
    table
}
