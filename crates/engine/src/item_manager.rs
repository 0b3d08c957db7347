//! Item cadence and selection
//!
//! The manager owns no mutable state of its own: the countdown lives in
//! [`GameState::lines_until_next_item`] and randomness comes from
//! [`GameState::item_rng`], so a cloned state replays the same items.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use blockfall_core::{GameState, ItemSettings};
use blockfall_types::ItemKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemManager {
    lines_per_item: u32,
    /// Enabled variants in canonical order
    enabled: Vec<ItemKind>,
}

impl ItemManager {
    pub fn new(settings: &ItemSettings) -> Self {
        Self {
            lines_per_item: settings.lines_per_item,
            enabled: settings.enabled_item_types.iter().copied().collect(),
        }
    }

    /// Whether items can ever be generated
    pub fn is_active(&self) -> bool {
        self.lines_per_item > 0 && !self.enabled.is_empty()
    }

    pub fn lines_per_item(&self) -> u32 {
        self.lines_per_item
    }

    pub fn is_enabled(&self, kind: ItemKind) -> bool {
        self.enabled.contains(&kind)
    }

    /// Pick one enabled variant uniformly at random
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<ItemKind> {
        self.enabled.choose(rng).copied()
    }

    /// Count cleared lines against the cadence
    ///
    /// When the countdown reaches zero an item is picked into
    /// [`GameState::next_item`] and the countdown restarts from the cadence minus the
    /// overshoot, so items land on every multiple of the cadence in cumulative lines.
    /// At most one item is generated per call: a lock that passes two multiples still
    /// leaves a single pending item, and the countdown stays aligned to the cadence.
    pub fn record_lines(&self, state: &mut GameState, lines: u32) -> Option<ItemKind> {
        if lines == 0 || !self.is_active() {
            return None;
        }

        let remaining = state.lines_until_next_item - lines as i32;
        if remaining > 0 {
            state.lines_until_next_item = remaining;
            return None;
        }

        let overshoot = remaining.unsigned_abs() % self.lines_per_item;
        state.lines_until_next_item = (self.lines_per_item - overshoot) as i32;

        let item = self.pick(&mut state.item_rng)?;
        state.next_item = Some(item);
        debug!(
            item = item.as_str(),
            lines_until_next = state.lines_until_next_item,
            "item generated"
        );
        Some(item)
    }
}
