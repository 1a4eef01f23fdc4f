use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    self, Burn, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::constants::*;
use crate::errors::CitadelError;
use crate::events::CollateralWithdrawn;
use crate::state::*;
use crate::utils;

/// Burn cUSD and withdraw collateral in one transaction
#[derive(Accounts)]
pub struct BurnAndRedeem<'info> {
    /// Borrower
    #[account(mut)]
    pub user: Signer<'info>,

    /// Engine configuration
    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Box<Account<'info, EngineConfig>>,

    /// Collateral mint being withdrawn
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Borrower's token account receiving the collateral
    #[account(
        mut,
        token::mint = collateral_mint,
        token::authority = user,
    )]
    pub user_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Engine custody vault for this mint
    #[account(
        mut,
        seeds = [VAULT_SEED, collateral_mint.key().as_ref()],
        bump,
        token::mint = collateral_mint,
        token::authority = config,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Borrower's collateral position for this mint
    #[account(
        mut,
        seeds = [COLLATERAL_POSITION_SEED, user.key().as_ref(), collateral_mint.key().as_ref()],
        bump = position.bump
    )]
    pub position: Box<Account<'info, CollateralPosition>>,

    /// cUSD mint
    #[account(
        mut,
        seeds = [CUSD_MINT_SEED],
        bump = config.mint_bump
    )]
    pub cusd_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Borrower's cUSD token account, the repayment is burned from here
    #[account(
        mut,
        token::mint = cusd_mint,
        token::authority = user,
    )]
    pub user_cusd_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Borrower's debt position
    #[account(
        mut,
        seeds = [DEBT_POSITION_SEED, user.key().as_ref()],
        bump = debt_position.bump
    )]
    pub debt_position: Box<Account<'info, DebtPosition>>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, BurnAndRedeem<'info>>,
    withdraw_amount: u64,
    burn_amount: u64,
) -> Result<()> {
    require!(
        withdraw_amount > 0 && burn_amount > 0,
        CitadelError::ZeroAmount
    );

    let mint_key = ctx.accounts.collateral_mint.key();
    require!(
        ctx.accounts.config.is_supported(&mint_key),
        CitadelError::UnsupportedAsset
    );
    require!(
        burn_amount <= ctx.accounts.debt_position.amount,
        CitadelError::InsufficientDebt
    );
    require!(
        withdraw_amount <= ctx.accounts.position.amount,
        CitadelError::InsufficientCollateral
    );

    let user_key = ctx.accounts.user.key();
    let clock = Clock::get()?;

    // Burn leg first, so the withdrawal is checked against the reduced debt
    token_interface::burn(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Burn {
                mint: ctx.accounts.cusd_mint.to_account_info(),
                from: ctx.accounts.user_cusd_account.to_account_info(),
                authority: ctx.accounts.user.to_account_info(),
            },
        ),
        burn_amount,
    )?;
    ctx.accounts.debt_position.debit(burn_amount)?;

    // Withdraw leg
    let snapshots = utils::collect_positions(
        &ctx.accounts.config,
        &user_key,
        ctx.remaining_accounts,
        &clock,
    )?;
    let total_value = utils::total_collateral_value(&snapshots)?;
    let snapshot = snapshots
        .iter()
        .find(|snapshot| snapshot.mint == mint_key)
        .ok_or(CitadelError::UnsupportedAsset)?;
    let withdrawn_value =
        utils::collateral_value(withdraw_amount, snapshot.decimals, snapshot.unit_price)?;
    let remaining_value = total_value
        .checked_sub(withdrawn_value)
        .ok_or(CitadelError::MathOverflow)?;

    let debt = utils::debt_value(ctx.accounts.debt_position.amount)?;
    require!(
        utils::is_healthy(remaining_value, debt)?,
        CitadelError::WithdrawalBreaksHealthFactor
    );

    ctx.accounts.position.debit(withdraw_amount)?;

    let seeds = &[CONFIG_SEED, &[ctx.accounts.config.bump]];
    let signer_seeds = &[&seeds[..]];

    token_interface::transfer_checked(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.vault.to_account_info(),
                mint: ctx.accounts.collateral_mint.to_account_info(),
                to: ctx.accounts.user_token_account.to_account_info(),
                authority: ctx.accounts.config.to_account_info(),
            },
            signer_seeds,
        ),
        withdraw_amount,
        ctx.accounts.collateral_mint.decimals,
    )?;

    emit!(CollateralWithdrawn {
        user: user_key,
        mint: mint_key,
        amount: withdraw_amount,
    });
    msg!(
        "Burned {} cUSD and withdrew {} units",
        burn_amount,
        withdraw_amount
    );

    Ok(())
}
