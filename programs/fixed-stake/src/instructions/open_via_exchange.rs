use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::errors::StakingError;
use crate::ledger::{self, TokenSource};
use crate::state::{Position, StakeConfig, CONFIG_SEED, POOL_AUTHORITY_SEED, POSITION_SEED};

#[derive(Accounts)]
pub struct OpenViaExchange<'info> {
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

    /// Holder's settlement tokens, approved to `pool_authority` beforehand
    #[account(
        mut,
        constraint = user_stake_account.mint == config.stake_mint @ StakingError::InvalidMint,
        constraint = user_stake_account.owner == user.key()
    )]
    pub user_stake_account: Account<'info, TokenAccount>,

    #[account(mut, address = config.treasury)]
    pub treasury: Account<'info, TokenAccount>,

    #[account(mut, address = config.reward_mint @ StakingError::InvalidMint)]
    pub reward_mint: Account<'info, Mint>,

    #[account(mut, address = config.vault)]
    pub vault: Account<'info, TokenAccount>,

    /// CHECK: PDA signer, delegate of `user_stake_account` and reward mint authority
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

/// Everything that can reject an exchange open, checked before any token moves:
/// position state, then allowance and balance of the settlement tokens, then the
/// minting role.
pub fn validate_open_via_exchange(
    position: &Position,
    source: &TokenSource,
    reward_mint_authority: &COption<Pubkey>,
    pool_authority: &Pubkey,
    amount: u64,
) -> std::result::Result<(), StakingError> {
    position.ensure_can_open(amount)?;
    ledger::ensure_transfer_from(
        source.balance,
        &source.delegate,
        source.delegated_amount,
        pool_authority,
        amount,
    )?;
    ledger::ensure_mint_authority(reward_mint_authority, pool_authority)
}

/// Pay `amount` of the settlement asset and stake the same amount of freshly
/// minted reward tokens.
pub fn handler(ctx: Context<OpenViaExchange>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;

    let pool_authority = ctx.accounts.pool_authority.key();
    validate_open_via_exchange(
        &ctx.accounts.position,
        &TokenSource::of(&ctx.accounts.user_stake_account),
        &ctx.accounts.reward_mint.mint_authority,
        &pool_authority,
        amount,
    )?;

    let config_key = ctx.accounts.config.key();
    let authority_bump = [ctx.accounts.config.authority_bump];
    let seeds: &[&[u8]] = &[POOL_AUTHORITY_SEED, config_key.as_ref(), &authority_bump];
    let signer_seeds = &[seeds];

    // Settlement asset into the treasury
    ledger::transfer_signed(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.user_stake_account.to_account_info(),
        ctx.accounts.treasury.to_account_info(),
        ctx.accounts.pool_authority.to_account_info(),
        signer_seeds,
        amount,
    )?;

    // Matching reward tokens into custody as principal
    ledger::mint_signed(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.reward_mint.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        ctx.accounts.pool_authority.to_account_info(),
        signer_seeds,
        amount,
    )?;

    let position = &mut ctx.accounts.position;
    position.open(ctx.accounts.user.key(), config_key, amount, clock.unix_timestamp)?;
    position.bump = ctx.bumps.position;

    let config = &mut ctx.accounts.config;
    config.record_open(amount);
    config.total_exchanged = config.total_exchanged.saturating_add(amount);

    msg!("Exchanged and staked {} tokens", amount);
    msg!("Unlocks at: {}", position.unlocks_at(config.stake_duration));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000;
    const AMOUNT: u64 = 1000;

    struct Setup {
        pool: Pubkey,
        position: Position,
    }

    impl Setup {
        fn new() -> Self {
            Self {
                pool: Pubkey::new_unique(),
                position: Position::default(),
            }
        }

        /// The handler's order: validate, move tokens, then open.
        fn open(
            &mut self,
            source: TokenSource,
            mint_authority: COption<Pubkey>,
            amount: u64,
        ) -> std::result::Result<(), StakingError> {
            validate_open_via_exchange(&self.position, &source, &mint_authority, &self.pool, amount)?;
            self.position
                .open(Pubkey::new_unique(), Pubkey::new_unique(), amount, T0)
        }

        fn assert_closed(&self) {
            assert!(!self.position.is_open());
            assert_eq!(self.position.staked_amount, 0);
            assert_eq!(self.position.staked_at, 0);
            assert_eq!(self.position.claimed_at, 0);
        }
    }

    #[test]
    fn opens_when_approved_funded_and_minting() {
        let mut setup = Setup::new();
        let source = TokenSource::approved(setup.pool, AMOUNT, AMOUNT);
        setup.open(source, COption::Some(setup.pool), AMOUNT).unwrap();
        assert_eq!(setup.position.staked_amount, AMOUNT);
        assert_eq!(setup.position.staked_at, T0);
        assert_eq!(setup.position.claimed_at, T0);
    }

    #[test]
    fn missing_allowance_opens_nothing() {
        let mut setup = Setup::new();
        let pool = setup.pool;
        for source in [
            TokenSource { balance: AMOUNT, delegate: COption::None, delegated_amount: 0 },
            TokenSource::approved(Pubkey::new_unique(), AMOUNT, AMOUNT),
            TokenSource::approved(pool, AMOUNT - 1, AMOUNT),
        ] {
            let err = setup.open(source, COption::Some(pool), AMOUNT).unwrap_err();
            assert!(matches!(err, StakingError::InsufficientAllowance));
            setup.assert_closed();
        }
    }

    #[test]
    fn missing_balance_opens_nothing() {
        let mut setup = Setup::new();
        let source = TokenSource::approved(setup.pool, AMOUNT, AMOUNT - 1);
        let err = setup.open(source, COption::Some(setup.pool), AMOUNT).unwrap_err();
        assert!(matches!(err, StakingError::InsufficientBalance));
        setup.assert_closed();
    }

    #[test]
    fn allowance_is_reported_before_balance() {
        let mut setup = Setup::new();
        let source = TokenSource { balance: 0, delegate: COption::None, delegated_amount: 0 };
        let err = setup.open(source, COption::Some(setup.pool), AMOUNT).unwrap_err();
        assert!(matches!(err, StakingError::InsufficientAllowance));
        setup.assert_closed();
    }

    #[test]
    fn without_the_minting_role_opens_nothing() {
        let mut setup = Setup::new();
        let source = TokenSource::approved(setup.pool, AMOUNT, AMOUNT);
        let err = setup
            .open(source, COption::Some(Pubkey::new_unique()), AMOUNT)
            .unwrap_err();
        assert!(matches!(err, StakingError::Unauthorized));
        setup.assert_closed();
    }

    #[test]
    fn second_open_is_rejected_before_token_checks() {
        let mut setup = Setup::new();
        let pool = setup.pool;
        setup
            .open(TokenSource::approved(pool, AMOUNT, AMOUNT), COption::Some(pool), AMOUNT)
            .unwrap();

        let empty = TokenSource { balance: 0, delegate: COption::None, delegated_amount: 0 };
        let err = setup.open(empty, COption::None, 1).unwrap_err();
        assert!(matches!(err, StakingError::AlreadyStaking));
        assert_eq!(setup.position.staked_amount, AMOUNT);
    }
}
