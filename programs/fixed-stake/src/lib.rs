use anchor_lang::prelude::*;

pub mod accrual;
pub mod errors;
pub mod instructions;
pub mod ledger;
pub mod state;

use instructions::*;

declare_id!("FixedStake111111111111111111111111111111111");

/// Fixed Stake Program
///
/// One position per holder. Principal is locked for `stake_duration` seconds
/// and earns reward tokens at a fixed linear annual rate, minted by the
/// program's pool authority on claim and on close.
#[program]
pub mod fixed_stake {
    use super::*;

    /// Create the stake config and its custody accounts
    pub fn initialize(
        ctx: Context<Initialize>,
        stake_duration: u64,
        annual_rate_percent: u32,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, stake_duration, annual_rate_percent)
    }

    /// Pay with the settlement asset and stake the same amount of newly minted reward tokens
    pub fn open_via_exchange(ctx: Context<OpenViaExchange>, amount: u64) -> Result<()> {
        instructions::open_via_exchange::handler(ctx, amount)
    }

    /// Stake reward tokens already held by the caller
    pub fn open_direct(ctx: Context<OpenDirect>, amount: u64) -> Result<()> {
        instructions::open_direct::handler(ctx, amount)
    }

    /// Mint accrued reward to the caller without touching the lock
    pub fn claim(ctx: Context<Claim>) -> Result<()> {
        instructions::claim::handler(ctx)
    }

    /// Withdraw principal and unclaimed reward after the lock period
    pub fn close(ctx: Context<Close>) -> Result<()> {
        instructions::close::handler(ctx)
    }

    /// Pending reward for `holder` (read only)
    pub fn reward(ctx: Context<ViewReward>) -> Result<u64> {
        instructions::reward::handler(ctx)
    }
}
