use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Burn, Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::errors::CitadelError;
use crate::state::*;

/// Repay cUSD debt by burning it
#[derive(Accounts)]
pub struct BurnCusd<'info> {
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

pub fn handler(ctx: Context<BurnCusd>, amount: u64) -> Result<()> {
    require!(amount > 0, CitadelError::ZeroAmount);
    require!(
        amount <= ctx.accounts.debt_position.amount,
        CitadelError::InsufficientDebt
    );

    // Destroy the repaid cUSD, then write the debt down. No health check:
    // repayment only reduces risk.
    token_interface::burn(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Burn {
                mint: ctx.accounts.cusd_mint.to_account_info(),
                from: ctx.accounts.user_cusd_account.to_account_info(),
                authority: ctx.accounts.user.to_account_info(),
            },
        ),
        amount,
    )?;

    let debt_position = &mut ctx.accounts.debt_position;
    debt_position.debit(amount)?;

    msg!("Burned {} cUSD, debt now {}", amount, debt_position.amount);

    Ok(())
}
