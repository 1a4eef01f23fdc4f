use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked};

use crate::constants::*;
use crate::errors::CitadelError;
use crate::events::CollateralWithdrawn;
use crate::state::*;
use crate::utils;

/// Withdraw collateral from the engine's custody
#[derive(Accounts)]
pub struct WithdrawCollateral<'info> {
    /// Depositor
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

    /// Depositor's token account receiving the collateral
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

    /// Depositor's collateral position for this mint
    #[account(
        mut,
        seeds = [COLLATERAL_POSITION_SEED, user.key().as_ref(), collateral_mint.key().as_ref()],
        bump = position.bump
    )]
    pub position: Box<Account<'info, CollateralPosition>>,

    /// Depositor's debt position, created empty if the user never minted
    #[account(
        init_if_needed,
        payer = user,
        space = DebtPosition::LEN,
        seeds = [DEBT_POSITION_SEED, user.key().as_ref()],
        bump
    )]
    pub debt_position: Box<Account<'info, DebtPosition>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, WithdrawCollateral<'info>>,
    amount: u64,
) -> Result<()> {
    require!(amount > 0, CitadelError::ZeroAmount);

    let mint_key = ctx.accounts.collateral_mint.key();
    require!(
        ctx.accounts.config.is_supported(&mint_key),
        CitadelError::UnsupportedAsset
    );
    require!(
        amount <= ctx.accounts.position.amount,
        CitadelError::InsufficientCollateral
    );

    let user_key = ctx.accounts.user.key();
    let clock = Clock::get()?;

    // The position must stay healthy without the withdrawn collateral
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
    let withdrawn_value = utils::collateral_value(amount, snapshot.decimals, snapshot.unit_price)?;
    let remaining_value = total_value
        .checked_sub(withdrawn_value)
        .ok_or(CitadelError::MathOverflow)?;

    let debt_bump = ctx.bumps.debt_position;
    let debt_position = &mut ctx.accounts.debt_position;
    if debt_position.owner == Pubkey::default() {
        debt_position.owner = user_key;
        debt_position.bump = debt_bump;
    }

    let debt = utils::debt_value(debt_position.amount)?;
    require!(
        utils::is_healthy(remaining_value, debt)?,
        CitadelError::WithdrawalBreaksHealthFactor
    );

    ctx.accounts.position.debit(amount)?;

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
        amount,
        ctx.accounts.collateral_mint.decimals,
    )?;

    emit!(CollateralWithdrawn {
        user: user_key,
        mint: mint_key,
        amount,
    });
    msg!(
        "Withdrew {} units, remaining balance: {}",
        amount,
        ctx.accounts.position.amount
    );

    Ok(())
}
