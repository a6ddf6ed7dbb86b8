use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::errors::StakingError;
use crate::ledger;
use crate::state::{Position, StakeConfig, CONFIG_SEED, POOL_AUTHORITY_SEED, POSITION_SEED};

#[derive(Accounts)]
pub struct Close<'info> {
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

    #[account(mut, address = config.vault)]
    pub vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = user_reward_account.mint == config.reward_mint @ StakingError::InvalidMint
    )]
    pub user_reward_account: Account<'info, TokenAccount>,

    /// CHECK: PDA signer, vault owner and reward mint authority
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

/// Withdraw principal plus unclaimed reward once the lock has expired.
pub fn handler(ctx: Context<Close>) -> Result<()> {
    let clock = Clock::get()?;
    let annual_rate_percent = ctx.accounts.config.annual_rate_percent;
    let stake_duration = ctx.accounts.config.stake_duration;

    let payout = ctx
        .accounts
        .position
        .withdraw(annual_rate_percent, stake_duration, clock.unix_timestamp)?;
    let total = payout.total()?;

    let pool_authority = ctx.accounts.pool_authority.key();
    ledger::ensure_mint_authority(&ctx.accounts.reward_mint.mint_authority, &pool_authority)?;

    // Principal must still be in custody; the reward part is minted below
    ledger::ensure_custody(ctx.accounts.vault.amount, payout.principal)?;

    let config_key = ctx.accounts.config.key();
    let authority_bump = [ctx.accounts.config.authority_bump];
    let seeds: &[&[u8]] = &[POOL_AUTHORITY_SEED, config_key.as_ref(), &authority_bump];
    let signer_seeds = &[seeds];

    if payout.reward > 0 {
        ledger::mint_signed(
            ctx.accounts.token_program.to_account_info(),
            ctx.accounts.reward_mint.to_account_info(),
            ctx.accounts.vault.to_account_info(),
            ctx.accounts.pool_authority.to_account_info(),
            signer_seeds,
            payout.reward,
        )?;
    }

    ctx.accounts.vault.reload()?;
    ledger::ensure_custody(ctx.accounts.vault.amount, total)?;

    ledger::transfer_signed(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        ctx.accounts.user_reward_account.to_account_info(),
        ctx.accounts.pool_authority.to_account_info(),
        signer_seeds,
        total,
    )?;

    let config = &mut ctx.accounts.config;
    config.record_close(payout.principal, payout.reward);

    msg!("Withdrew {} tokens ({} principal, {} reward)", total, payout.principal, payout.reward);
    msg!("Total staked: {}", config.total_staked);

    Ok(())
}
