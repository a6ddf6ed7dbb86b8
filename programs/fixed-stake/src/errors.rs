use anchor_lang::prelude::*;

#[error_code]
pub enum StakingError {
    #[msg("Already staking")]
    AlreadyStaking,

    #[msg("Not staking")]
    NotStaking,

    #[msg("Insufficient balance to stake")]
    InsufficientBalance,

    #[msg("Insufficient allowance for transfer")]
    InsufficientAllowance,

    #[msg("Staked amount still locked")]
    Locked,

    #[msg("Program does not hold the reward mint authority")]
    Unauthorized,

    #[msg("Insufficient reward tokens in custody")]
    InsufficientCustody,

    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Token account does not belong to the expected mint")]
    InvalidMint,

    #[msg("Invalid staking configuration")]
    InvalidConfig,

    #[msg("Arithmetic overflow")]
    Overflow,
}
