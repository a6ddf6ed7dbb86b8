use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};
use crate::errors::StakingError;
use crate::ledger::{self, TokenSource};
use crate::state::{Position, StakeConfig, CONFIG_SEED, POOL_AUTHORITY_SEED, POSITION_SEED};

#[derive(Accounts)]
pub struct OpenDirect<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED, config.reward_mint.as_ref(), config.stake_mint.as_ref()],
        bump = config.bump
    )]
    pub config: Account<'info, StakeConfig>,

    #[account(
        init_if_needed,
        payer = user,
        space = Position::SIZE,
        seeds = [POSITION_SEED, config.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub position: Account<'info, Position>,

    /// Holder's reward tokens, approved to `pool_authority` beforehand
    #[account(
        mut,
        constraint = user_reward_account.mint == config.reward_mint @ StakingError::InvalidMint,
        constraint = user_reward_account.owner == user.key()
    )]
    pub user_reward_account: Account<'info, TokenAccount>,

    #[account(mut, address = config.vault)]
    pub vault: Account<'info, TokenAccount>,

    /// CHECK: PDA signer, delegate of `user_reward_account`
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

/// Everything that can reject a direct open, checked before any token moves:
/// position state, then balance, then allowance.
pub fn validate_open_direct(
    position: &Position,
    source: &TokenSource,
    pool_authority: &Pubkey,
    amount: u64,
) -> std::result::Result<(), StakingError> {
    position.ensure_can_open(amount)?;
    ledger::ensure_balance(source.balance, amount)?;
    ledger::ensure_allowance(&source.delegate, source.delegated_amount, pool_authority, amount)
}

pub fn handler(ctx: Context<OpenDirect>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;

    let pool_authority = ctx.accounts.pool_authority.key();
    validate_open_direct(
        &ctx.accounts.position,
        &TokenSource::of(&ctx.accounts.user_reward_account),
        &pool_authority,
        amount,
    )?;

    let config_key = ctx.accounts.config.key();
    let authority_bump = [ctx.accounts.config.authority_bump];
    let seeds: &[&[u8]] = &[POOL_AUTHORITY_SEED, config_key.as_ref(), &authority_bump];

    ledger::transfer_signed(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.user_reward_account.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        ctx.accounts.pool_authority.to_account_info(),
        &[seeds],
        amount,
    )?;

    let position = &mut ctx.accounts.position;
    position.open(ctx.accounts.user.key(), config_key, amount, clock.unix_timestamp)?;
    position.bump = ctx.bumps.position;

    let config = &mut ctx.accounts.config;
    config.record_open(amount);

    msg!("Staked {} tokens", amount);
    msg!("Total staked: {}", config.total_staked);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::solana_program::program_option::COption;

    const T0: i64 = 1_700_000_000;
    const AMOUNT: u64 = 1000;

    fn try_open(
        position: &mut Position,
        source: TokenSource,
        pool: &Pubkey,
        amount: u64,
    ) -> std::result::Result<(), StakingError> {
        validate_open_direct(position, &source, pool, amount)?;
        position.open(Pubkey::new_unique(), Pubkey::new_unique(), amount, T0)
    }

    fn assert_closed(position: &Position) {
        assert!(!position.is_open());
        assert_eq!(position.staked_amount, 0);
        assert_eq!(position.staked_at, 0);
        assert_eq!(position.claimed_at, 0);
    }

    #[test]
    fn opens_when_funded_and_approved() {
        let pool = Pubkey::new_unique();
        let mut position = Position::default();
        try_open(&mut position, TokenSource::approved(pool, AMOUNT, AMOUNT), &pool, AMOUNT)
            .unwrap();
        assert_eq!(position.staked_amount, AMOUNT);
        assert_eq!(position.staked_at, T0);
        assert_eq!(position.claimed_at, T0);
    }

    #[test]
    fn unfunded_and_unapproved_reports_balance_first() {
        let pool = Pubkey::new_unique();
        let mut position = Position::default();
        let source = TokenSource { balance: 0, delegate: COption::None, delegated_amount: 0 };
        let err = try_open(&mut position, source, &pool, 1).unwrap_err();
        assert!(matches!(err, StakingError::InsufficientBalance));
        assert_closed(&position);
    }

    #[test]
    fn missing_balance_opens_nothing() {
        let pool = Pubkey::new_unique();
        let mut position = Position::default();
        let source = TokenSource::approved(pool, AMOUNT, AMOUNT - 1);
        let err = try_open(&mut position, source, &pool, AMOUNT).unwrap_err();
        assert!(matches!(err, StakingError::InsufficientBalance));
        assert_closed(&position);
    }

    #[test]
    fn missing_allowance_opens_nothing() {
        let pool = Pubkey::new_unique();
        let mut position = Position::default();
        for source in [
            TokenSource { balance: AMOUNT, delegate: COption::None, delegated_amount: 0 },
            TokenSource::approved(pool, AMOUNT - 1, AMOUNT),
        ] {
            let err = try_open(&mut position, source, &pool, AMOUNT).unwrap_err();
            assert!(matches!(err, StakingError::InsufficientAllowance));
            assert_closed(&position);
        }
    }

    #[test]
    fn zero_amount_opens_nothing() {
        let pool = Pubkey::new_unique();
        let mut position = Position::default();
        let err = try_open(&mut position, TokenSource::approved(pool, 0, 0), &pool, 0).unwrap_err();
        assert!(matches!(err, StakingError::InvalidAmount));
        assert_closed(&position);
    }
}
