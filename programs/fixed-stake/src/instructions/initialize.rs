use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use anchor_lang::solana_program::program_option::COption;
use crate::state::{StakeConfig, CONFIG_SEED, POOL_AUTHORITY_SEED, TREASURY_SEED, VAULT_SEED};

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = authority,
        space = StakeConfig::SIZE,
        seeds = [CONFIG_SEED, reward_mint.key().as_ref(), stake_mint.key().as_ref()],
        bump
    )]
    pub config: Account<'info, StakeConfig>,

    /// Settlement asset taken in by exchange opens
    pub stake_mint: Account<'info, Mint>,

    /// Reward asset, its mint authority must be handed to `pool_authority`
    pub reward_mint: Account<'info, Mint>,

    /// CHECK: PDA signer for custody accounts and reward minting
    #[account(
        seeds = [POOL_AUTHORITY_SEED, config.key().as_ref()],
        bump
    )]
    pub pool_authority: UncheckedAccount<'info>,

    #[account(
        init,
        payer = authority,
        seeds = [VAULT_SEED, config.key().as_ref()],
        bump,
        token::mint = reward_mint,
        token::authority = pool_authority
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = authority,
        seeds = [TREASURY_SEED, config.key().as_ref()],
        bump,
        token::mint = stake_mint,
        token::authority = pool_authority
    )]
    pub treasury: Account<'info, TokenAccount>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, stake_duration: u64, annual_rate_percent: u32) -> Result<()> {
    StakeConfig::validate_terms(stake_duration)?;

    let config = &mut ctx.accounts.config;
    let clock = Clock::get()?;

    config.authority = ctx.accounts.authority.key();
    config.stake_mint = ctx.accounts.stake_mint.key();
    config.reward_mint = ctx.accounts.reward_mint.key();
    config.vault = ctx.accounts.vault.key();
    config.treasury = ctx.accounts.treasury.key();
    config.pool_authority = ctx.accounts.pool_authority.key();
    config.stake_duration = stake_duration;
    config.annual_rate_percent = annual_rate_percent;
    config.total_staked = 0;
    config.open_positions = 0;
    config.total_rewards_minted = 0;
    config.total_exchanged = 0;
    config.created_at = clock.unix_timestamp;
    config.bump = ctx.bumps.config;
    config.authority_bump = ctx.bumps.pool_authority;
    config.vault_bump = ctx.bumps.vault;
    config.treasury_bump = ctx.bumps.treasury;

    msg!("Initialized stake config");
    msg!("Stake mint: {}, reward mint: {}", config.stake_mint, config.reward_mint);
    msg!("Duration: {}s, rate: {}%/year", stake_duration, annual_rate_percent);

    if ctx.accounts.reward_mint.mint_authority != COption::Some(config.pool_authority) {
        msg!("Reward mint authority not yet held by {}", config.pool_authority);
    }

    Ok(())
}
