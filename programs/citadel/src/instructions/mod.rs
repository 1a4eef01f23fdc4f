pub mod burn_and_redeem;
pub mod burn_cusd;
pub mod deposit_and_mint;
pub mod deposit_collateral;
pub mod initialize;
pub mod liquidate;
pub mod mint_cusd;
pub mod withdraw_collateral;

pub use burn_and_redeem::*;
pub use burn_cusd::*;
pub use deposit_and_mint::*;
pub use deposit_collateral::*;
pub use initialize::*;
pub use liquidate::*;
pub use mint_cusd::*;
pub use withdraw_collateral::*;
