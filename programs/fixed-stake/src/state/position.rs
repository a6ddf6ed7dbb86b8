use anchor_lang::prelude::*;

use crate::accrual::{accrued_reward, elapsed_seconds};
use crate::errors::StakingError;

/// A holder's single staking position under one config
/// PDA: ["position", config, owner]
///
/// Either fully open (all three of `staked_amount`, `staked_at`, `claimed_at`
/// non-zero) or fully closed (all zero). The account outlives a close and is
/// reused by the next open.
#[account]
#[derive(Default)]
pub struct Position {
    /// Holder of this position
    pub owner: Pubkey,

    /// StakeConfig this position belongs to
    pub config: Pubkey,

    /// Reward tokens locked in the vault, 0 when closed
    pub staked_amount: u64,

    /// Open time, drives the lock. Never moves while open
    pub staked_at: i64,

    /// Last settlement time, drives accrual
    pub claimed_at: i64,

    /// Bump seed for PDA derivation
    pub bump: u8,

    /// Reserved for future use
    pub _reserved: [u8; 32],
}

/// What a close pays back to the holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    pub principal: u64,
    pub reward: u64,
}

impl Payout {
    pub fn total(&self) -> std::result::Result<u64, StakingError> {
        self.principal
            .checked_add(self.reward)
            .ok_or(StakingError::Overflow)
    }
}

impl Position {
    pub const SIZE: usize = 8 + // discriminator
        32 + // owner
        32 + // config
        8 +  // staked_amount
        8 +  // staked_at
        8 +  // claimed_at
        1 +  // bump
        32;  // reserved

    pub fn is_open(&self) -> bool {
        self.staked_amount > 0
    }

    pub fn ensure_can_open(&self, amount: u64) -> std::result::Result<(), StakingError> {
        if self.is_open() {
            return Err(StakingError::AlreadyStaking);
        }
        if amount == 0 {
            return Err(StakingError::InvalidAmount);
        }
        Ok(())
    }

    /// Start a new position at `now`. Both clocks start together.
    pub fn open(
        &mut self,
        owner: Pubkey,
        config: Pubkey,
        amount: u64,
        now: i64,
    ) -> std::result::Result<(), StakingError> {
        self.ensure_can_open(amount)?;

        self.owner = owner;
        self.config = config;
        self.staked_amount = amount;
        self.staked_at = now;
        self.claimed_at = now;
        Ok(())
    }

    /// Reward accrued since the last settlement, without settling it.
    pub fn pending_reward(
        &self,
        annual_rate_percent: u32,
        now: i64,
    ) -> std::result::Result<u64, StakingError> {
        if !self.is_open() {
            return Err(StakingError::NotStaking);
        }
        accrued_reward(
            self.staked_amount,
            annual_rate_percent,
            elapsed_seconds(self.claimed_at, now),
        )
    }

    /// Settle accrued reward and restart the reward clock. The lock clock is untouched.
    pub fn claim(
        &mut self,
        annual_rate_percent: u32,
        now: i64,
    ) -> std::result::Result<u64, StakingError> {
        let reward = self.pending_reward(annual_rate_percent, now)?;
        self.claimed_at = now;
        Ok(reward)
    }

    pub fn unlocks_at(&self, stake_duration: u64) -> i64 {
        let duration = i64::try_from(stake_duration).unwrap_or(i64::MAX);
        self.staked_at.saturating_add(duration)
    }

    pub fn ensure_unlocked(
        &self,
        stake_duration: u64,
        now: i64,
    ) -> std::result::Result<(), StakingError> {
        if !self.is_open() {
            return Err(StakingError::NotStaking);
        }
        if elapsed_seconds(self.staked_at, now) < stake_duration {
            return Err(StakingError::Locked);
        }
        Ok(())
    }

    /// Settle everything and reset to the closed state. Not named `close`, which
    /// `Account<Position>` already resolves to `AccountsClose::close`.
    pub fn withdraw(
        &mut self,
        annual_rate_percent: u32,
        stake_duration: u64,
        now: i64,
    ) -> std::result::Result<Payout, StakingError> {
        self.ensure_unlocked(stake_duration, now)?;

        let payout = Payout {
            principal: self.staked_amount,
            reward: self.pending_reward(annual_rate_percent, now)?,
        };
        payout.total()?;

        self.staked_amount = 0;
        self.staked_at = 0;
        self.claimed_at = 0;
        Ok(payout)
    }
}
