use anchor_lang::prelude::*;

#[error_code]
pub enum CitadelError {
    #[msg("Zero amount not allowed")]
    ZeroAmount,

    #[msg("Asset is not registered as collateral")]
    UnsupportedAsset,

    #[msg("Collateral mints and price feeds must pair up one to one")]
    ConfigMismatch,

    #[msg("Too many collateral assets")]
    TooManyCollateralAssets,

    #[msg("Insufficient collateral")]
    InsufficientCollateral,

    #[msg("Insufficient debt to repay")]
    InsufficientDebt,

    #[msg("Collateral in this asset cannot cover the seizure")]
    InsufficientCollateralForSeizure,

    #[msg("Withdrawal would leave the position undercollateralized")]
    WithdrawalBreaksHealthFactor,

    #[msg("Mint would exceed collateral capacity")]
    MintExceedsCollateralCapacity,

    #[msg("Cannot liquidate a healthy position")]
    PositionSafe,

    #[msg("Oracle reported a non-positive price")]
    InvalidOraclePrice,

    #[msg("Oracle price is stale or does not match the registered feed")]
    StalePrice,

    #[msg("Collateral position account does not match the registry")]
    InvalidCollateralAccount,

    #[msg("Expected a position and a price update account per registered asset")]
    MissingCollateralAccounts,

    #[msg("Math overflow")]
    MathOverflow,
}
