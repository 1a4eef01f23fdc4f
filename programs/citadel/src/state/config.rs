use anchor_lang::prelude::*;

use crate::constants::*;

/// A registered collateral asset and the Pyth feed that prices it
#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct CollateralEntry {
    /// Collateral token mint
    pub mint: Pubkey,

    /// Pyth price feed id, hex encoded
    pub price_feed_id: String,

    /// Decimals of the collateral mint, recorded at registration
    pub decimals: u8,
}

impl CollateralEntry {
    pub const LEN: usize = 32 + // mint
        4 + FEED_ID_HEX_LEN +   // price_feed_id
        1;                      // decimals
}

/// Engine configuration - singleton PDA, immutable after initialize
#[account]
pub struct EngineConfig {
    /// Authority that initialized the engine
    pub authority: Pubkey,

    /// cUSD mint address
    pub cusd_mint: Pubkey,

    /// Registered collateral assets, fixed at initialization
    pub collaterals: Vec<CollateralEntry>,

    /// Bump seed for PDA
    pub bump: u8,

    /// Bump seed for the cUSD mint PDA
    pub mint_bump: u8,
}

impl EngineConfig {
    pub const LEN: usize = 8 + // discriminator
        32 + // authority
        32 + // cusd_mint
        4 + MAX_COLLATERAL_ASSETS * CollateralEntry::LEN + // collaterals
        1 +  // bump
        1 +  // mint_bump
        64;  // reserved

    /// Look up the registry entry for a collateral mint
    pub fn collateral_entry(&self, mint: &Pubkey) -> Option<&CollateralEntry> {
        self.collaterals.iter().find(|entry| entry.mint == *mint)
    }

    pub fn is_supported(&self, mint: &Pubkey) -> bool {
        self.collateral_entry(mint).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(mints: &[Pubkey]) -> EngineConfig {
        EngineConfig {
            authority: Pubkey::new_unique(),
            cusd_mint: Pubkey::new_unique(),
            collaterals: mints
                .iter()
                .map(|mint| CollateralEntry {
                    mint: *mint,
                    price_feed_id: "ef".repeat(32),
                    decimals: 9,
                })
                .collect(),
            bump: 255,
            mint_bump: 254,
        }
    }

    #[test]
    fn finds_registered_entries() {
        let mints = [Pubkey::new_unique(), Pubkey::new_unique()];
        let config = config_with(&mints);

        assert!(config.is_supported(&mints[0]));
        assert!(config.is_supported(&mints[1]));
        assert_eq!(config.collateral_entry(&mints[1]).unwrap().mint, mints[1]);
    }

    #[test]
    fn rejects_unregistered_mint() {
        let config = config_with(&[Pubkey::new_unique()]);

        assert!(!config.is_supported(&Pubkey::new_unique()));
        assert!(config.collateral_entry(&Pubkey::new_unique()).is_none());
    }
}
