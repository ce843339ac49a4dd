//! Completion length budget.
//!
//! A token is roughly 0.75 words, so a story of `n` words needs about
//! `n * 1.33` tokens.

pub const MIN_MAX_TOKENS: u16 = 256;
pub const MAX_MAX_TOKENS: u16 = 4096;

/// `floor(target_words * 1.33)` clamped to `[256, 4096]`.
pub fn estimate_max_tokens(target_words: i64) -> u16 {
    let tokens = target_words.saturating_mul(133).div_euclid(100);
    tokens.clamp(MIN_MAX_TOKENS as i64, MAX_MAX_TOKENS as i64) as u16
}
