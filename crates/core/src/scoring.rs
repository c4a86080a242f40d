//! Scoring module - points and the star economy
//!
//! Two currencies come out of a line clear:
//! - **points** follow classic rules (line table times level, T-spin tables,
//!   a 3/2 back-to-back multiplier and a flat combo bonus);
//! - **stars** are spent on abilities. Every star bonus is additive, so the
//!   order in which bonuses are applied never matters.

use crate::types::{
    TSpinKind, BACK_TO_BACK_BONUS_STARS, COMBO_BONUS_STARS, DROP_INTERVALS,
    DROP_INTERVAL_FLOOR_MS, LINE_CLEAR_BASE_STARS, LINE_SCORES, PERFECT_CLEAR_BONUS_STARS,
    TSPIN_BONUS_STARS,
};

/// Combo scoring base value (50 points per combo step)
pub const COMBO_BASE_POINTS: u32 = 50;

/// Point calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Base points for the clear (includes B2B multiplier, excludes combo bonus).
    pub line_clear_score: u32,
    pub combo_bonus: u32,
    pub total: u32,
    pub qualifies_for_b2b: bool,
    pub b2b_applied: bool,
}

/// Classic line clear points for 1-4 lines at a 0-based level
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines > 4 {
        return 0;
    }
    LINE_SCORES[lines] * (level + 1)
}

/// T-spin points
pub fn calculate_tspin_score(tspin: TSpinKind, lines: usize, level: u32) -> u32 {
    let base = match (tspin, lines) {
        (TSpinKind::Full, 0) => 400,
        (TSpinKind::Full, 1) => 800,
        (TSpinKind::Full, 2) => 1200,
        (TSpinKind::Full, 3) => 1600,
        (TSpinKind::Mini, 0) => 100,
        (TSpinKind::Mini, 1) => 200,
        (TSpinKind::Mini, 2) => 400,
        _ => 0,
    };
    base * (level + 1)
}

/// B2B applies to full T-spins with lines and to 4-line clears
pub fn qualifies_for_b2b(tspin: TSpinKind, lines: usize) -> bool {
    matches!(
        (tspin, lines),
        (TSpinKind::Full, 1..=4) | (TSpinKind::None, 4)
    )
}

/// Points for a clear. `combo_count` is the number of consecutive clearing
/// locks before this one.
pub fn calculate_score(
    lines: usize,
    level: u32,
    tspin: TSpinKind,
    combo_count: u32,
    previous_b2b: bool,
) -> ScoreResult {
    let qualifies = qualifies_for_b2b(tspin, lines);
    let base_points = match tspin {
        TSpinKind::Full | TSpinKind::Mini => calculate_tspin_score(tspin, lines, level),
        TSpinKind::None => calculate_line_score(lines, level),
    };

    let b2b_applied = qualifies && previous_b2b;
    let line_clear_score = if b2b_applied {
        base_points.saturating_mul(3) / 2
    } else {
        base_points
    };
    let combo_bonus = COMBO_BASE_POINTS.saturating_mul(combo_count);

    ScoreResult {
        line_clear_score,
        combo_bonus,
        total: line_clear_score.saturating_add(combo_bonus),
        qualifies_for_b2b: qualifies,
        b2b_applied,
    }
}

/// Soft drop: +1 per cell, hard drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    if is_hard_drop {
        cells * 2
    } else {
        cells
    }
}

/// Level increases every 10 lines cleared
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / 10
}

/// Gravity interval for a level (milliseconds per row)
pub fn get_drop_interval_ms(level: u32) -> u32 {
    DROP_INTERVALS
        .get(level as usize)
        .copied()
        .unwrap_or(DROP_INTERVAL_FLOOR_MS)
}

/// T-spin bonus tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TSpinTier {
    Single,
    Double,
    Triple,
}

impl TSpinTier {
    /// Tier implied by the number of lines a T-spin cleared
    pub fn from_lines(lines: usize) -> Option<Self> {
        match lines {
            1 => Some(TSpinTier::Single),
            2 => Some(TSpinTier::Double),
            3 => Some(TSpinTier::Triple),
            _ => None,
        }
    }

    pub fn bonus_stars(self) -> u32 {
        match self {
            TSpinTier::Single => TSPIN_BONUS_STARS[0],
            TSpinTier::Double => TSPIN_BONUS_STARS[1],
            TSpinTier::Triple => TSPIN_BONUS_STARS[2],
        }
    }
}

/// Modifiers for a star award
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StarOptions {
    pub combo_count: u32,
    pub include_combo_bonus: bool,
    pub back_to_back: bool,
    pub tspin: bool,
    /// Overrides the tier derived from the line count
    pub tspin_tier: Option<TSpinTier>,
    pub perfect_clear: bool,
}

/// Itemised star award
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StarResult {
    pub base: u32,
    pub combo_bonus: u32,
    pub back_to_back_bonus: u32,
    pub tspin_bonus: u32,
    pub perfect_clear_bonus: u32,
    pub total: u32,
}

/// Base stars for clearing `lines` rows at once; 0 outside 1..=4
pub fn line_clear_base_stars(lines: usize) -> u32 {
    LINE_CLEAR_BASE_STARS.get(lines).copied().unwrap_or(0)
}

/// Stars earned by a clear. A lock that clears nothing earns nothing.
///
/// ```
/// use versus_tetris_core::scoring::{calculate_stars, StarOptions};
///
/// let plain = calculate_stars(2, &StarOptions::default());
/// assert_eq!(plain.total, 12);
/// ```
pub fn calculate_stars(lines: usize, opts: &StarOptions) -> StarResult {
    if lines == 0 {
        return StarResult::default();
    }

    let base = line_clear_base_stars(lines);
    let combo_bonus = if opts.include_combo_bonus {
        opts.combo_count.saturating_mul(COMBO_BONUS_STARS)
    } else {
        0
    };
    let back_to_back_bonus = if opts.back_to_back {
        BACK_TO_BACK_BONUS_STARS
    } else {
        0
    };
    let tspin_bonus = if opts.tspin {
        opts.tspin_tier
            .or_else(|| TSpinTier::from_lines(lines))
            .map(TSpinTier::bonus_stars)
            .unwrap_or(0)
    } else {
        0
    };
    let perfect_clear_bonus = if opts.perfect_clear {
        PERFECT_CLEAR_BONUS_STARS
    } else {
        0
    };

    StarResult {
        base,
        combo_bonus,
        back_to_back_bonus,
        tspin_bonus,
        perfect_clear_bonus,
        total: base + combo_bonus + back_to_back_bonus + tspin_bonus + perfect_clear_bonus,
    }
}
