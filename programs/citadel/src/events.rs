use anchor_lang::prelude::*;

#[event]
pub struct CollateralDeposited {
    pub user: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

#[event]
pub struct CollateralWithdrawn {
    pub user: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

#[event]
pub struct PositionLiquidated {
    pub liquidator: Pubkey,
    pub user: Pubkey,
    pub mint: Pubkey,
    pub debt_repaid: u64,
    pub collateral_seized: u64,
}
