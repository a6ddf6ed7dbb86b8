use anchor_lang::prelude::*;
use crate::errors::StakingError;
use crate::state::{Position, StakeConfig, CONFIG_SEED, POSITION_SEED};

#[derive(Accounts)]
pub struct ViewReward<'info> {
    #[account(
        seeds = [CONFIG_SEED, config.reward_mint.as_ref(), config.stake_mint.as_ref()],
        bump = config.bump
    )]
    pub config: Account<'info, StakeConfig>,

    /// CHECK: Position PDA of `holder`, may not have been created yet
    #[account(
        seeds = [POSITION_SEED, config.key().as_ref(), holder.key().as_ref()],
        bump
    )]
    pub position: UncheckedAccount<'info>,

    /// CHECK: Holder being queried, read only
    pub holder: UncheckedAccount<'info>,
}

/// Reward `holder` would receive if it claimed now. Returned as program return data.
pub fn handler(ctx: Context<ViewReward>) -> Result<u64> {
    let clock = Clock::get()?;
    let info = ctx.accounts.position.to_account_info();

    if info.owner != &crate::ID || info.data_is_empty() {
        return err!(StakingError::NotStaking);
    }

    let position = {
        let data = info.try_borrow_data()?;
        Position::try_deserialize(&mut &data[..])?
    };

    let reward = position.pending_reward(ctx.accounts.config.annual_rate_percent, clock.unix_timestamp)?;

    msg!("Pending reward for {}: {}", ctx.accounts.holder.key(), reward);

    Ok(reward)
}
