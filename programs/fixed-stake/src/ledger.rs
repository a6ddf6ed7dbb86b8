//! Token ledger plumbing for the stake and reward mints.
//!
//! The `ensure_*` checks mirror what the SPL token program would refuse, but run
//! before any CPI so a failing instruction reports a `StakingError` instead of a
//! generic token program error. The CPI helpers all sign as the pool authority.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::{self, MintTo, TokenAccount, Transfer};

use crate::errors::StakingError;

/// The parts of a holder's token account a `transferFrom` depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSource {
    pub balance: u64,
    pub delegate: COption<Pubkey>,
    pub delegated_amount: u64,
}

impl TokenSource {
    pub fn of(account: &TokenAccount) -> Self {
        Self {
            balance: account.amount,
            delegate: account.delegate,
            delegated_amount: account.delegated_amount,
        }
    }
}

#[cfg(test)]
impl TokenSource {
    /// Holder that approved `spender` for `allowance` and holds `balance`.
    pub fn approved(spender: Pubkey, allowance: u64, balance: u64) -> Self {
        Self {
            balance,
            delegate: COption::Some(spender),
            delegated_amount: allowance,
        }
    }
}

pub fn ensure_balance(balance: u64, amount: u64) -> std::result::Result<(), StakingError> {
    if balance < amount {
        return Err(StakingError::InsufficientBalance);
    }
    Ok(())
}

/// `spender` must be the approved delegate of the source account for at least `amount`.
pub fn ensure_allowance(
    delegate: &COption<Pubkey>,
    delegated_amount: u64,
    spender: &Pubkey,
    amount: u64,
) -> std::result::Result<(), StakingError> {
    match delegate {
        COption::Some(key) if key == spender && delegated_amount >= amount => Ok(()),
        _ => Err(StakingError::InsufficientAllowance),
    }
}

/// Allowance first, then balance, the order a `transferFrom` spends them in.
pub fn ensure_transfer_from(
    balance: u64,
    delegate: &COption<Pubkey>,
    delegated_amount: u64,
    spender: &Pubkey,
    amount: u64,
) -> std::result::Result<(), StakingError> {
    ensure_allowance(delegate, delegated_amount, spender, amount)?;
    ensure_balance(balance, amount)
}

pub fn ensure_custody(held: u64, owed: u64) -> std::result::Result<(), StakingError> {
    if held < owed {
        return Err(StakingError::InsufficientCustody);
    }
    Ok(())
}

/// Minting is only possible while `authority` holds the mint's minting role.
pub fn ensure_mint_authority(
    mint_authority: &COption<Pubkey>,
    authority: &Pubkey,
) -> std::result::Result<(), StakingError> {
    match mint_authority {
        COption::Some(key) if key == authority => Ok(()),
        _ => Err(StakingError::Unauthorized),
    }
}

/// Move `amount` out of `from` with the pool authority signing, either as the
/// owner of a custody account or as the approved delegate of a holder's account.
pub fn transfer_signed<'info>(
    token_program: AccountInfo<'info>,
    from: AccountInfo<'info>,
    to: AccountInfo<'info>,
    pool_authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    let cpi_accounts = Transfer {
        from,
        to,
        authority: pool_authority,
    };
    let cpi_ctx = CpiContext::new_with_signer(token_program, cpi_accounts, signer_seeds);
    token::transfer(cpi_ctx, amount)
}

pub fn mint_signed<'info>(
    token_program: AccountInfo<'info>,
    mint: AccountInfo<'info>,
    to: AccountInfo<'info>,
    pool_authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    let cpi_accounts = MintTo {
        mint,
        to,
        authority: pool_authority,
    };
    let cpi_ctx = CpiContext::new_with_signer(token_program, cpi_accounts, signer_seeds);
    token::mint_to(cpi_ctx, amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_must_cover_amount() {
        assert!(ensure_balance(10, 10).is_ok());
        assert!(matches!(
            ensure_balance(9, 10),
            Err(StakingError::InsufficientBalance)
        ));
    }

    #[test]
    fn allowance_requires_matching_delegate_and_amount() {
        let pool = Pubkey::new_unique();
        let other = Pubkey::new_unique();

        assert!(ensure_allowance(&COption::Some(pool), 100, &pool, 100).is_ok());

        for (delegate, delegated) in [
            (COption::None, 100),
            (COption::Some(other), 100),
            (COption::Some(pool), 99),
        ] {
            assert!(matches!(
                ensure_allowance(&delegate, delegated, &pool, 100),
                Err(StakingError::InsufficientAllowance)
            ));
        }
    }

    #[test]
    fn transfer_from_checks_allowance_before_balance() {
        let pool = Pubkey::new_unique();

        // neither approved nor funded: allowance is reported
        assert!(matches!(
            ensure_transfer_from(0, &COption::None, 0, &pool, 100),
            Err(StakingError::InsufficientAllowance)
        ));
        // approved but not funded
        assert!(matches!(
            ensure_transfer_from(50, &COption::Some(pool), 100, &pool, 100),
            Err(StakingError::InsufficientBalance)
        ));
        assert!(ensure_transfer_from(100, &COption::Some(pool), 100, &pool, 100).is_ok());
    }

    #[test]
    fn custody_must_cover_what_is_owed() {
        assert!(ensure_custody(1200, 1200).is_ok());
        assert!(matches!(
            ensure_custody(1199, 1200),
            Err(StakingError::InsufficientCustody)
        ));
    }

    #[test]
    fn minting_requires_the_role() {
        let pool = Pubkey::new_unique();
        assert!(ensure_mint_authority(&COption::Some(pool), &pool).is_ok());
        assert!(matches!(
            ensure_mint_authority(&COption::None, &pool),
            Err(StakingError::Unauthorized)
        ));
        assert!(matches!(
            ensure_mint_authority(&COption::Some(Pubkey::new_unique()), &pool),
            Err(StakingError::Unauthorized)
        ));
    }
}
