pub mod stake_config;
pub mod position;

pub use stake_config::*;
pub use position::*;

pub const CONFIG_SEED: &[u8] = b"stake-config";
pub const POSITION_SEED: &[u8] = b"position";
pub const POOL_AUTHORITY_SEED: &[u8] = b"pool-authority";
pub const VAULT_SEED: &[u8] = b"vault";
pub const TREASURY_SEED: &[u8] = b"treasury";
