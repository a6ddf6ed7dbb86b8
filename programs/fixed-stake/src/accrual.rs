use crate::errors::StakingError;

/// 365 days, leap days ignored.
pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 3600;

/// `annual_rate_percent` is a whole percentage.
pub const PERCENT_DENOMINATOR: u64 = 100;

/// Seconds between two unix timestamps, zero if the clock is behind `since`.
pub fn elapsed_seconds(since: i64, now: i64) -> u64 {
    u64::try_from(now.saturating_sub(since)).unwrap_or(0)
}

/// Linear simple interest on `staked_amount` over `elapsed` seconds.
///
/// reward = staked_amount * annual_rate_percent * elapsed / (SECONDS_PER_YEAR * 100)
///
/// The division truncates. Elapsed time is not capped at the stake duration:
/// reward keeps accruing until it is claimed or the position is closed.
pub fn accrued_reward(
    staked_amount: u64,
    annual_rate_percent: u32,
    elapsed: u64,
) -> std::result::Result<u64, StakingError> {
    let numerator = (staked_amount as u128)
        .checked_mul(annual_rate_percent as u128)
        .and_then(|v| v.checked_mul(elapsed as u128))
        .ok_or(StakingError::Overflow)?;

    let denominator = (SECONDS_PER_YEAR as u128) * (PERCENT_DENOMINATOR as u128);

    u64::try_from(numerator / denominator).map_err(|_| StakingError::Overflow)
}
