use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked};

use crate::constants::*;
use crate::errors::CitadelError;
use crate::events::CollateralDeposited;
use crate::state::*;

/// Deposit collateral into the engine's custody
#[derive(Accounts)]
pub struct DepositCollateral<'info> {
    /// Depositor
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

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<DepositCollateral>, amount: u64) -> Result<()> {
    require!(amount > 0, CitadelError::ZeroAmount);
    require!(
        ctx.accounts
            .config
            .is_supported(&ctx.accounts.collateral_mint.key()),
        CitadelError::UnsupportedAsset
    );

    // Move the tokens into custody before crediting the ledger. No health
    // check: deposits only reduce risk.
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
        amount,
        ctx.accounts.collateral_mint.decimals,
    )?;

    let position = &mut ctx.accounts.position;
    if position.owner == Pubkey::default() {
        position.owner = ctx.accounts.user.key();
        position.mint = ctx.accounts.collateral_mint.key();
        position.bump = ctx.bumps.position;
    }
    position.credit(amount)?;

    emit!(CollateralDeposited {
        user: ctx.accounts.user.key(),
        mint: ctx.accounts.collateral_mint.key(),
        amount,
    });
    msg!(
        "Deposited {} units, new balance: {}",
        amount,
        ctx.accounts.position.amount
    );

    Ok(())
}
