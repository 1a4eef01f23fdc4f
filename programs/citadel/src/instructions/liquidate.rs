use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Burn, Mint, TokenAccount, TokenInterface, TransferChecked};

use crate::constants::*;
use crate::errors::CitadelError;
use crate::events::PositionLiquidated;
use crate::state::*;
use crate::utils;

/// Liquidate an undercollateralized position
#[derive(Accounts)]
pub struct Liquidate<'info> {
    /// Liquidator (anyone can call)
    #[account(mut)]
    pub liquidator: Signer<'info>,

    /// Position owner being liquidated
    /// CHECK: Only used for PDA derivation
    pub target: AccountInfo<'info>,

    /// Engine configuration
    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Box<Account<'info, EngineConfig>>,

    /// Collateral mint chosen for the seizure
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Target's collateral position for the seized asset
    #[account(
        mut,
        seeds = [COLLATERAL_POSITION_SEED, target.key().as_ref(), collateral_mint.key().as_ref()],
        bump = target_position.bump
    )]
    pub target_position: Box<Account<'info, CollateralPosition>>,

    /// Target's debt position
    #[account(
        mut,
        seeds = [DEBT_POSITION_SEED, target.key().as_ref()],
        bump = target_debt.bump
    )]
    pub target_debt: Box<Account<'info, DebtPosition>>,

    /// Engine custody vault for the seized mint
    #[account(
        mut,
        seeds = [VAULT_SEED, collateral_mint.key().as_ref()],
        bump,
        token::mint = collateral_mint,
        token::authority = config,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// cUSD mint
    #[account(
        mut,
        seeds = [CUSD_MINT_SEED],
        bump = config.mint_bump
    )]
    pub cusd_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Liquidator's cUSD token account, the repayment is burned from here
    #[account(
        mut,
        token::mint = cusd_mint,
        token::authority = liquidator,
    )]
    pub liquidator_cusd_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Liquidator's token account receiving the seized collateral
    #[account(
        mut,
        token::mint = collateral_mint,
        token::authority = liquidator,
    )]
    pub liquidator_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, Liquidate<'info>>,
    debt_to_repay: u64,
) -> Result<()> {
    require!(debt_to_repay > 0, CitadelError::ZeroAmount);

    let mint_key = ctx.accounts.collateral_mint.key();
    let entry = ctx
        .accounts
        .config
        .collateral_entry(&mint_key)
        .ok_or(CitadelError::UnsupportedAsset)?
        .clone();

    let target_key = ctx.accounts.target.key();
    let clock = Clock::get()?;

    // Only unsafe positions may be liquidated
    let snapshots = utils::collect_positions(
        &ctx.accounts.config,
        &target_key,
        ctx.remaining_accounts,
        &clock,
    )?;
    let total_value = utils::total_collateral_value(&snapshots)?;
    let debt = utils::debt_value(ctx.accounts.target_debt.amount)?;
    require!(
        !utils::is_healthy(total_value, debt)?,
        CitadelError::PositionSafe
    );
    require!(
        debt_to_repay <= ctx.accounts.target_debt.amount,
        CitadelError::InsufficientDebt
    );

    // Repay: destroy the liquidator's cUSD and write the debt down
    token_interface::burn(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Burn {
                mint: ctx.accounts.cusd_mint.to_account_info(),
                from: ctx.accounts.liquidator_cusd_account.to_account_info(),
                authority: ctx.accounts.liquidator.to_account_info(),
            },
        ),
        debt_to_repay,
    )?;
    ctx.accounts.target_debt.debit(debt_to_repay)?;

    // Seize collateral worth 110% of the repaid debt, from this one asset.
    // Shortfall beyond the chosen asset is not covered elsewhere.
    let snapshot = snapshots
        .iter()
        .find(|snapshot| snapshot.mint == mint_key)
        .ok_or(CitadelError::UnsupportedAsset)?;
    let repaid_value = utils::debt_value(debt_to_repay)?;
    let seized = utils::seizure_amount(repaid_value, snapshot.unit_price, entry.decimals)?;
    require!(
        seized <= ctx.accounts.target_position.amount,
        CitadelError::InsufficientCollateralForSeizure
    );

    ctx.accounts.target_position.debit(seized)?;

    let seeds = &[CONFIG_SEED, &[ctx.accounts.config.bump]];
    let signer_seeds = &[&seeds[..]];

    token_interface::transfer_checked(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.vault.to_account_info(),
                mint: ctx.accounts.collateral_mint.to_account_info(),
                to: ctx.accounts.liquidator_token_account.to_account_info(),
                authority: ctx.accounts.config.to_account_info(),
            },
            signer_seeds,
        ),
        seized,
        ctx.accounts.collateral_mint.decimals,
    )?;

    emit!(PositionLiquidated {
        liquidator: ctx.accounts.liquidator.key(),
        user: target_key,
        mint: mint_key,
        debt_repaid: debt_to_repay,
        collateral_seized: seized,
    });
    msg!(
        "Liquidated {}: repaid {} cUSD, seized {} units",
        target_key,
        debt_to_repay,
        seized
    );

    Ok(())
}
