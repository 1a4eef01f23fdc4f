// Protocol constants for Citadel

/// USD values are carried at 18 decimal places
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Decimal places of the USD accounting scale
pub const ACCOUNTING_DECIMALS: u32 = 18;

/// Share of collateral value usable as borrowing capacity, in percent
pub const LIQUIDATION_THRESHOLD: u128 = 50;

/// Extra share of repaid debt value paid out to a liquidator, in percent
pub const LIQUIDATION_BONUS: u128 = 10;

/// Percent denominator
pub const PERCENT_DIVISOR: u128 = 100;

/// Maximum accepted age of a price update (seconds)
pub const MAX_PRICE_AGE_SECS: u64 = 60;

/// Upper bound on registered collateral assets
pub const MAX_COLLATERAL_ASSETS: usize = 8;

/// Pyth feed ids are 32 bytes, hex encoded
pub const FEED_ID_HEX_LEN: usize = 64;

/// cUSD decimals
pub const CUSD_DECIMALS: u8 = 9;

/// Seeds for PDA derivation
pub const CONFIG_SEED: &[u8] = b"config";
pub const CUSD_MINT_SEED: &[u8] = b"cusd_mint";
pub const VAULT_SEED: &[u8] = b"vault";
pub const COLLATERAL_POSITION_SEED: &[u8] = b"collateral";
pub const DEBT_POSITION_SEED: &[u8] = b"debt";
