//! Scoring module - line clear, T-spin, combo, back-to-back and level rules
//!
//! Scoring order for a lock that clears lines:
//! 1. Base points from the table for (T-spin kind, lines).
//! 2. Back-to-back: a difficult clear (Tetris or line-clearing T-spin) following another
//!    difficult clear multiplies the base by 3/2.
//! 3. Combo bonus `combo * 50 * level`, where `combo` counts the clearing locks before
//!    this one.
//! 4. Perfect clear bonus by line count if the board ends up empty.
//! 5. The sum is multiplied by the level.
//!
//! A T-spin that clears nothing scores its table entry times the level and nothing else.

use crate::types::{
    TSpinKind, B2B_DENOMINATOR, B2B_NUMERATOR, COMBO_BASE, HARD_DROP_POINTS, LINES_PER_LEVEL,
    LINE_SCORES, MAX_LEVEL, PERFECT_CLEAR_SCORES, SOFT_DROP_POINTS, TSPIN_MINI_SCORES,
    TSPIN_SCORES,
};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Table points for the clear, including the back-to-back multiplier.
    pub line_clear_score: u64,
    /// Combo bonus added on top of `line_clear_score` (before the level multiplier).
    pub combo_bonus: u64,
    pub perfect_clear_bonus: u64,
    /// Everything above, multiplied by the level.
    pub total: u64,
    /// Whether this clear counts as difficult for back-to-back purposes.
    pub difficult: bool,
    /// Whether the back-to-back multiplier was applied.
    pub b2b_applied: bool,
}

/// Base table points for a clear, before any multiplier
pub fn base_score(lines: usize, tspin: TSpinKind) -> u64 {
    match tspin {
        TSpinKind::Full => TSPIN_SCORES[lines.min(TSPIN_SCORES.len() - 1)],
        TSpinKind::Mini => TSPIN_MINI_SCORES[lines.min(TSPIN_MINI_SCORES.len() - 1)],
        TSpinKind::None => LINE_SCORES[lines.min(LINE_SCORES.len() - 1)],
    }
}

/// Check if this clear is difficult (Tetris or a line-clearing T-spin of any kind)
pub fn is_difficult(lines: usize, tspin: TSpinKind) -> bool {
    lines == 4 || (lines > 0 && tspin.is_tspin())
}

/// Apply the B2B multiplier (3/2) to a point value.
pub fn apply_b2b_multiplier(points: u64) -> u64 {
    points.saturating_mul(B2B_NUMERATOR) / B2B_DENOMINATOR
}

/// Combo bonus for `combo` previous consecutive clears at `level`
pub fn combo_bonus(combo: u32, level: u32) -> u64 {
    COMBO_BASE * combo as u64 * level as u64
}

/// Perfect clear bonus by line count
pub fn perfect_clear_bonus(lines: usize) -> u64 {
    PERFECT_CLEAR_SCORES[lines.min(PERFECT_CLEAR_SCORES.len() - 1)]
}

/// Calculate the complete score for one lock
///
/// `combo` and `back_to_back` are the counters as they stood before this lock.
pub fn calculate_score(
    lines: usize,
    tspin: TSpinKind,
    perfect_clear: bool,
    level: u32,
    combo: u32,
    back_to_back: u32,
) -> ScoreResult {
    let level_mult = level as u64;

    if lines == 0 {
        let line_clear_score = if tspin.is_tspin() {
            base_score(0, tspin)
        } else {
            0
        };
        return ScoreResult {
            line_clear_score,
            total: line_clear_score * level_mult,
            ..ScoreResult::default()
        };
    }

    let difficult = is_difficult(lines, tspin);
    let b2b_applied = difficult && back_to_back > 0;
    let base = base_score(lines, tspin);
    let line_clear_score = if b2b_applied {
        apply_b2b_multiplier(base)
    } else {
        base
    };
    let combo_bonus = combo_bonus(combo, level);
    let perfect_clear_bonus = if perfect_clear {
        perfect_clear_bonus(lines)
    } else {
        0
    };

    ScoreResult {
        line_clear_score,
        combo_bonus,
        perfect_clear_bonus,
        total: (line_clear_score + combo_bonus + perfect_clear_bonus) * level_mult,
        difficult,
        b2b_applied,
    }
}

/// Back-to-back counter after a line-clearing lock
///
/// A difficult clear extends the streak (the first one starts it at 1); any other
/// clear breaks it.
pub fn next_back_to_back(back_to_back: u32, difficult: bool) -> u32 {
    if difficult {
        back_to_back + 1
    } else {
        0
    }
}

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u64 {
    let per_cell = if is_hard_drop {
        HARD_DROP_POINTS
    } else {
        SOFT_DROP_POINTS
    };
    cells as u64 * per_cell
}

/// Scale a score by a difficulty multiplier, rounded to the nearest point
pub fn scale_score(points: u64, multiplier: f64) -> u64 {
    (points as f64 * multiplier.max(0.0)).round() as u64
}

/// Level management
///
/// Given the level, its line requirement and the running line total, returns the new
/// `(level, required)`. Requirements are cumulative: reaching level `n` sets the next
/// requirement to `n * 10` total lines. Level never exceeds [`MAX_LEVEL`].
pub fn advance_level(level: u32, required: u32, total_lines: u32) -> (u32, u32) {
    let (mut level, mut required) = (level, required);
    while total_lines >= required && level < MAX_LEVEL {
        level += 1;
        required = level * LINES_PER_LEVEL;
    }
    (level, required)
}
