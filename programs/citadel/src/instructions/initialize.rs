use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenInterface};
use pyth_solana_receiver_sdk::price_update::get_feed_id_from_hex;

use crate::constants::*;
use crate::errors::CitadelError;
use crate::state::*;

/// Create the engine config and the cUSD mint, and register the collateral
/// assets the engine will accept. The registry is fixed after this call.
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The authority initializing the engine
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Engine configuration PDA
    #[account(
        init,
        payer = authority,
        space = EngineConfig::LEN,
        seeds = [CONFIG_SEED],
        bump
    )]
    pub config: Box<Account<'info, EngineConfig>>,

    /// cUSD mint, minted and burned under the config PDA's authority
    #[account(
        init,
        payer = authority,
        seeds = [CUSD_MINT_SEED],
        bump,
        mint::decimals = CUSD_DECIMALS,
        mint::authority = config,
        mint::token_program = token_program,
    )]
    pub cusd_mint: Box<InterfaceAccount<'info, Mint>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<Initialize>,
    collateral_mints: Vec<Pubkey>,
    price_feed_ids: Vec<String>,
) -> Result<()> {
    require!(
        collateral_mints.len() == price_feed_ids.len(),
        CitadelError::ConfigMismatch
    );
    require!(!collateral_mints.is_empty(), CitadelError::ConfigMismatch);
    require!(
        collateral_mints.len() <= MAX_COLLATERAL_ASSETS,
        CitadelError::TooManyCollateralAssets
    );
    // The mint accounts ride along as remaining accounts so their decimals
    // can be recorded in the registry.
    require!(
        ctx.remaining_accounts.len() == collateral_mints.len(),
        CitadelError::ConfigMismatch
    );

    let config = &mut ctx.accounts.config;
    config.authority = ctx.accounts.authority.key();
    config.cusd_mint = ctx.accounts.cusd_mint.key();
    config.bump = ctx.bumps.config;
    config.mint_bump = ctx.bumps.cusd_mint;

    for ((mint_key, feed_id), mint_info) in collateral_mints
        .iter()
        .zip(price_feed_ids.into_iter())
        .zip(ctx.remaining_accounts.iter())
    {
        require_keys_eq!(*mint_info.key, *mint_key, CitadelError::ConfigMismatch);
        require!(
            feed_id.len() == FEED_ID_HEX_LEN,
            CitadelError::ConfigMismatch
        );
        // Reject malformed feed ids at construction rather than first use
        get_feed_id_from_hex(&feed_id)?;

        let mint = InterfaceAccount::<Mint>::try_from(mint_info)?;
        config.collaterals.push(CollateralEntry {
            mint: *mint_key,
            price_feed_id: feed_id,
            decimals: mint.decimals,
        });
    }

    msg!(
        "Citadel initialized with {} collateral assets",
        config.collaterals.len()
    );

    Ok(())
}
