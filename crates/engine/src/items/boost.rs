use blockfall_core::GameState;
use blockfall_types::{ItemKind, BONUS_SCORE_POINTS, SPEED_RESET_POINTS};

use super::ItemEffect;

/// Restore the soft drop speed and tell the caller's timer to re-read it
pub(super) fn speed_reset(state: &mut GameState) -> ItemEffect {
    state.soft_drop_speed_multiplier = 1.0;
    state.speed_reset_requested = true;
    ItemEffect::success(ItemKind::SpeedReset, 0, SPEED_RESET_POINTS, "speed reset")
}

/// Flat bonus; the level does not scale it
pub(super) fn bonus_score(_state: &mut GameState) -> ItemEffect {
    ItemEffect::success(
        ItemKind::BonusScore,
        0,
        BONUS_SCORE_POINTS,
        format!("bonus +{BONUS_SCORE_POINTS}"),
    )
}
