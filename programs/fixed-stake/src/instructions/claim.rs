use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::errors::StakingError;
use crate::ledger;
use crate::state::{Position, StakeConfig, CONFIG_SEED, POOL_AUTHORITY_SEED, POSITION_SEED};

#[derive(Accounts)]
pub struct Claim<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED, config.reward_mint.as_ref(), config.stake_mint.as_ref()],
        bump = config.bump
    )]
    pub config: Account<'info, StakeConfig>,

    // Created on demand so a holder without a position gets NotStaking
    #[account(
        init_if_needed,
        payer = user,
        space = Position::SIZE,
        seeds = [POSITION_SEED, config.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub position: Account<'info, Position>,

    #[account(mut, address = config.reward_mint @ StakingError::InvalidMint)]
    pub reward_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = user_reward_account.mint == config.reward_mint @ StakingError::InvalidMint
    )]
    pub user_reward_account: Account<'info, TokenAccount>,

    /// CHECK: PDA signer, reward mint authority
    #[account(
        seeds = [POOL_AUTHORITY_SEED, config.key().as_ref()],
        bump = config.authority_bump
    )]
    pub pool_authority: UncheckedAccount<'info>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Claim>) -> Result<()> {
    let clock = Clock::get()?;
    let annual_rate_percent = ctx.accounts.config.annual_rate_percent;

    let reward = ctx.accounts.position.claim(annual_rate_percent, clock.unix_timestamp)?;

    let pool_authority = ctx.accounts.pool_authority.key();
    ledger::ensure_mint_authority(&ctx.accounts.reward_mint.mint_authority, &pool_authority)?;

    if reward > 0 {
        let config_key = ctx.accounts.config.key();
        let authority_bump = [ctx.accounts.config.authority_bump];
        let seeds: &[&[u8]] = &[POOL_AUTHORITY_SEED, config_key.as_ref(), &authority_bump];

        ledger::mint_signed(
            ctx.accounts.token_program.to_account_info(),
            ctx.accounts.reward_mint.to_account_info(),
            ctx.accounts.user_reward_account.to_account_info(),
            ctx.accounts.pool_authority.to_account_info(),
            &[seeds],
            reward,
        )?;
    }

    ctx.accounts.config.record_reward(reward);

    msg!("Claimed {} reward tokens", reward);
    msg!("Claimed at: {}", ctx.accounts.position.claimed_at);

    Ok(())
}
