use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token_interface::{self, Mint, MintTo, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::errors::CitadelError;
use crate::state::*;
use crate::utils;

/// Mint cUSD against deposited collateral
#[derive(Accounts)]
pub struct MintCusd<'info> {
    /// Borrower
    #[account(mut)]
    pub user: Signer<'info>,

    /// Engine configuration
    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Box<Account<'info, EngineConfig>>,

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
    ctx: Context<'_, '_, '_, 'info, MintCusd<'info>>,
    amount: u64,
) -> Result<()> {
    require!(amount > 0, CitadelError::ZeroAmount);

    let user_key = ctx.accounts.user.key();
    let clock = Clock::get()?;

    // Remaining accounts carry (position, price update) pairs in registry
    // order; the solvency check reads every registered asset.
    let snapshots = utils::collect_positions(
        &ctx.accounts.config,
        &user_key,
        ctx.remaining_accounts,
        &clock,
    )?;
    let total_value = utils::total_collateral_value(&snapshots)?;

    let debt_position = &mut ctx.accounts.debt_position;
    if debt_position.owner == Pubkey::default() {
        debt_position.owner = user_key;
        debt_position.bump = ctx.bumps.debt_position;
    }

    let new_debt = debt_position
        .amount
        .checked_add(amount)
        .ok_or(CitadelError::MathOverflow)?;
    require!(
        utils::is_healthy(total_value, utils::debt_value(new_debt)?)?,
        CitadelError::MintExceedsCollateralCapacity
    );
    debt_position.credit(amount)?;

    // Mint only after the solvency check passed
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
        amount,
    )?;

    msg!(
        "Minted {} cUSD, debt now {}",
        amount,
        ctx.accounts.debt_position.amount
    );

    Ok(())
}
