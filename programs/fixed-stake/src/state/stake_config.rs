use anchor_lang::prelude::*;

use crate::errors::StakingError;

/// Immutable staking terms plus running totals
/// PDA: ["stake-config", reward_mint, stake_mint]
#[account]
#[derive(Default)]
pub struct StakeConfig {
    /// Deployer (informational, holds no special rights)
    pub authority: Pubkey,

    /// Settlement asset accepted by `open_via_exchange`
    pub stake_mint: Pubkey,

    /// Reward asset: minted as interest, locked as principal
    pub reward_mint: Pubkey,

    /// Reward token custody, PDA ["vault", config]
    pub vault: Pubkey,

    /// Settlement token custody, PDA ["treasury", config]
    pub treasury: Pubkey,

    /// PDA ["pool-authority", config]: owns both custody accounts, acts as
    /// delegate for allowance transfers and must be the reward mint authority
    pub pool_authority: Pubkey,

    /// Lock period in seconds
    pub stake_duration: u64,

    /// Whole percent per 365-day year
    pub annual_rate_percent: u32,

    /// Principal currently locked across all positions
    pub total_staked: u64,

    /// Number of open positions
    pub open_positions: u32,

    /// Reward tokens minted as interest, lifetime
    pub total_rewards_minted: u64,

    /// Settlement tokens received through exchange opens, lifetime
    pub total_exchanged: u64,

    pub created_at: i64,

    pub bump: u8,
    pub authority_bump: u8,
    pub vault_bump: u8,
    pub treasury_bump: u8,

    /// Reserved for future use
    pub _reserved: [u8; 32],
}

impl StakeConfig {
    pub const SIZE: usize = 8 + // discriminator
        32 + // authority
        32 + // stake_mint
        32 + // reward_mint
        32 + // vault
        32 + // treasury
        32 + // pool_authority
        8 +  // stake_duration
        4 +  // annual_rate_percent
        8 +  // total_staked
        4 +  // open_positions
        8 +  // total_rewards_minted
        8 +  // total_exchanged
        8 +  // created_at
        4 +  // bumps
        32;  // reserved

    /// Any rate is accepted, and both ledgers may be the same mint: vault and
    /// treasury are separate PDAs either way.
    pub fn validate_terms(stake_duration: u64) -> std::result::Result<(), StakingError> {
        // lock arithmetic runs on i64 unix timestamps
        if stake_duration > i64::MAX as u64 {
            return Err(StakingError::InvalidConfig);
        }
        Ok(())
    }

    pub fn record_open(&mut self, amount: u64) {
        self.total_staked = self.total_staked.saturating_add(amount);
        self.open_positions = self.open_positions.saturating_add(1);
    }

    pub fn record_reward(&mut self, reward: u64) {
        self.total_rewards_minted = self.total_rewards_minted.saturating_add(reward);
    }

    pub fn record_close(&mut self, principal: u64, reward: u64) {
        self.total_staked = self.total_staked.saturating_sub(principal);
        self.open_positions = self.open_positions.saturating_sub(1);
        self.record_reward(reward);
    }
}
