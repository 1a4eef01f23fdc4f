use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token_interface::{
    self, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked,
};

use crate::constants::*;
use crate::errors::CitadelError;
use crate::events::CollateralDeposited;
use crate::state::*;
use crate::utils;

/// Deposit collateral and mint cUSD against it in one transaction
#[derive(Accounts)]
pub struct DepositAndMint<'info> {
    /// Depositor and borrower
    #[account(mut)]
    pub user: Signer<'info>,

    /// Engine configuration
    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Box<Account<'info, EngineConfig>>,

    /// Collateral mint being deposited
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Depositor's token account for the collateral mint
    #[account(
        mut,
        token::mint = collateral_mint,
        token::authority = user,
    )]
    pub user_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Engine custody vault for this mint, created on first deposit
    #[account(
        init_if_needed,
        payer = user,
        seeds = [VAULT_SEED, collateral_mint.key().as_ref()],
        bump,
        token::mint = collateral_mint,
        token::authority = config,
        token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Depositor's collateral position, created on first deposit
    #[account(
        init_if_needed,
        payer = user,
        space = CollateralPosition::LEN,
        seeds = [COLLATERAL_POSITION_SEED, user.key().as_ref(), collateral_mint.key().as_ref()],
        bump
    )]
    pub position: Box<Account<'info, CollateralPosition>>,

    /// cUSD mint
    #[account(
        mut,
        seeds = [CUSD_MINT_SEED],
        bump = config.mint_bump
    )]
    pub cusd_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Borrower's cUSD token account, created on first mint
    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = cusd_mint,
        associated_token::authority = user,
        associated_token::token_program = token_program,
    )]
    pub user_cusd_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Borrower's debt position, created on first mint
    #[account(
        init_if_needed,
        payer = user,
        space = DebtPosition::LEN,
        seeds = [DEBT_POSITION_SEED, user.key().as_ref()],
        bump
    )]
    pub debt_position: Box<Account<'info, DebtPosition>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, DepositAndMint<'info>>,
    deposit_amount: u64,
    mint_amount: u64,
) -> Result<()> {
    require!(deposit_amount > 0 && mint_amount > 0, CitadelError::ZeroAmount);

    let mint_key = ctx.accounts.collateral_mint.key();
    require!(
        ctx.accounts.config.is_supported(&mint_key),
        CitadelError::UnsupportedAsset
    );

    let user_key = ctx.accounts.user.key();
    let clock = Clock::get()?;

    // Deposit leg
    token_interface::transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.user_token_account.to_account_info(),
                mint: ctx.accounts.collateral_mint.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
                authority: ctx.accounts.user.to_account_info(),
            },
        ),
        deposit_amount,
        ctx.accounts.collateral_mint.decimals,
    )?;

    let position_bump = ctx.bumps.position;
    let position = &mut ctx.accounts.position;
    if position.owner == Pubkey::default() {
        position.owner = user_key;
        position.mint = mint_key;
        position.bump = position_bump;
    }
    position.credit(deposit_amount)?;

    emit!(CollateralDeposited {
        user: user_key,
        mint: mint_key,
        amount: deposit_amount,
    });

    // Mint leg. The snapshots read committed account data, so the value of
    // the deposit made above is added on top.
    let snapshots = utils::collect_positions(
        &ctx.accounts.config,
        &user_key,
        ctx.remaining_accounts,
        &clock,
    )?;
    let snapshot = snapshots
        .iter()
        .find(|snapshot| snapshot.mint == mint_key)
        .ok_or(CitadelError::UnsupportedAsset)?;
    let deposited_value =
        utils::collateral_value(deposit_amount, snapshot.decimals, snapshot.unit_price)?;
    let total_value = utils::total_collateral_value(&snapshots)?
        .checked_add(deposited_value)
        .ok_or(CitadelError::MathOverflow)?;

    let debt_bump = ctx.bumps.debt_position;
    let debt_position = &mut ctx.accounts.debt_position;
    if debt_position.owner == Pubkey::default() {
        debt_position.owner = user_key;
        debt_position.bump = debt_bump;
    }
    let new_debt = debt_position
        .amount
        .checked_add(mint_amount)
        .ok_or(CitadelError::MathOverflow)?;
    require!(
        utils::is_healthy(total_value, utils::debt_value(new_debt)?)?,
        CitadelError::MintExceedsCollateralCapacity
    );
    debt_position.credit(mint_amount)?;

    let seeds = &[CONFIG_SEED, &[ctx.accounts.config.bump]];
    let signer_seeds = &[&seeds[..]];

    token_interface::mint_to(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.cusd_mint.to_account_info(),
                to: ctx.accounts.user_cusd_account.to_account_info(),
                authority: ctx.accounts.config.to_account_info(),
            },
            signer_seeds,
        ),
        mint_amount,
    )?;

    msg!(
        "Deposited {} units and minted {} cUSD",
        deposit_amount,
        mint_amount
    );

    Ok(())
}
