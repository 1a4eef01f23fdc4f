use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod oracle;
pub mod state;
pub mod utils;

use instructions::*;

declare_id!("CiTDLfSbCrqUSZmPDNAiV6RaqsNsLCrCrKTygLhbJGTL");

/// Citadel - an over-collateralized debt engine on Solana
///
/// Users deposit registered collateral assets and mint cUSD, a USD-pegged
/// synthetic token, against up to 50% of their collateral's oracle value.
/// Positions whose collateral no longer covers twice their debt can be
/// liquidated by anyone, with the liquidator receiving the repaid value
/// plus a 10% bonus in collateral.
///
/// Instructions that evaluate solvency (mint, withdraw, liquidate and the
/// composites) take the caller's collateral position PDA and the asset's
/// Pyth price update account for every registered asset as remaining
/// accounts, in registry order.
#[program]
pub mod citadel {
    use super::*;

    /// Create the engine config and the cUSD mint, registering the
    /// accepted collateral assets. Can only be called once; the registry
    /// is immutable afterwards.
    ///
    /// # Arguments
    /// * `collateral_mints` - Accepted collateral mints (also passed as
    ///   remaining accounts, in the same order)
    /// * `price_feed_ids` - Pyth feed id (hex) per mint
    pub fn initialize(
        ctx: Context<Initialize>,
        collateral_mints: Vec<Pubkey>,
        price_feed_ids: Vec<String>,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, collateral_mints, price_feed_ids)
    }

    /// Deposit collateral into the engine's custody
    ///
    /// # Arguments
    /// * `amount` - Amount to deposit, in the mint's base units
    pub fn deposit_collateral(ctx: Context<DepositCollateral>, amount: u64) -> Result<()> {
        instructions::deposit_collateral::handler(ctx, amount)
    }

    /// Withdraw collateral; the position must stay healthy afterwards
    ///
    /// # Arguments
    /// * `amount` - Amount to withdraw, in the mint's base units
    pub fn withdraw_collateral<'info>(
        ctx: Context<'_, '_, '_, 'info, WithdrawCollateral<'info>>,
        amount: u64,
    ) -> Result<()> {
        instructions::withdraw_collateral::handler(ctx, amount)
    }

    /// Mint cUSD against deposited collateral, up to 50% of its value
    ///
    /// # Arguments
    /// * `amount` - Amount of cUSD to mint (9 decimals)
    pub fn mint_cusd<'info>(
        ctx: Context<'_, '_, '_, 'info, MintCusd<'info>>,
        amount: u64,
    ) -> Result<()> {
        instructions::mint_cusd::handler(ctx, amount)
    }

    /// Repay cUSD debt by burning it
    ///
    /// # Arguments
    /// * `amount` - Amount of cUSD to burn (9 decimals)
    pub fn burn_cusd(ctx: Context<BurnCusd>, amount: u64) -> Result<()> {
        instructions::burn_cusd::handler(ctx, amount)
    }

    /// Deposit collateral and mint cUSD against it in one transaction
    pub fn deposit_and_mint<'info>(
        ctx: Context<'_, '_, '_, 'info, DepositAndMint<'info>>,
        deposit_amount: u64,
        mint_amount: u64,
    ) -> Result<()> {
        instructions::deposit_and_mint::handler(ctx, deposit_amount, mint_amount)
    }

    /// Burn cUSD and withdraw collateral in one transaction
    pub fn burn_and_redeem<'info>(
        ctx: Context<'_, '_, '_, 'info, BurnAndRedeem<'info>>,
        withdraw_amount: u64,
        burn_amount: u64,
    ) -> Result<()> {
        instructions::burn_and_redeem::handler(ctx, withdraw_amount, burn_amount)
    }

    /// Liquidate an undercollateralized position: burn the liquidator's
    /// cUSD against the target's debt and pay out collateral worth 110%
    /// of the repayment
    ///
    /// # Arguments
    /// * `debt_to_repay` - Amount of the target's debt to repay (9 decimals)
    pub fn liquidate<'info>(
        ctx: Context<'_, '_, '_, 'info, Liquidate<'info>>,
        debt_to_repay: u64,
    ) -> Result<()> {
        instructions::liquidate::handler(ctx, debt_to_repay)
    }
}
