use anchor_lang::prelude::*;

use crate::errors::CitadelError;

/// Deposited collateral for one (user, mint) pair
///
/// Created on first deposit and never closed; the amount may rest at zero.
#[account]
#[derive(Default)]
pub struct CollateralPosition {
    /// Position owner
    pub owner: Pubkey,

    /// Collateral token mint
    pub mint: Pubkey,

    /// Deposited amount in the mint's base units
    pub amount: u64,

    /// Bump seed for PDA
    pub bump: u8,
}

impl CollateralPosition {
    pub const LEN: usize = 8 + // discriminator
        32 + // owner
        32 + // mint
        8 +  // amount
        1;   // bump

    pub fn credit(&mut self, amount: u64) -> Result<()> {
        self.amount = self
            .amount
            .checked_add(amount)
            .ok_or(CitadelError::MathOverflow)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u64) -> Result<()> {
        require!(amount <= self.amount, CitadelError::InsufficientCollateral);
        self.amount -= amount;
        Ok(())
    }
}

/// Outstanding cUSD debt for one user, across all collateral assets
#[account]
#[derive(Default)]
pub struct DebtPosition {
    /// Position owner
    pub owner: Pubkey,

    /// Outstanding debt in cUSD base units
    pub amount: u64,

    /// Bump seed for PDA
    pub bump: u8,
}

impl DebtPosition {
    pub const LEN: usize = 8 + // discriminator
        32 + // owner
        8 +  // amount
        1;   // bump

    pub fn credit(&mut self, amount: u64) -> Result<()> {
        self.amount = self
            .amount
            .checked_add(amount)
            .ok_or(CitadelError::MathOverflow)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u64) -> Result<()> {
        require!(amount <= self.amount, CitadelError::InsufficientDebt);
        self.amount -= amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collateral_credit_accumulates() {
        let mut position = CollateralPosition::default();
        position.credit(5_000_000_000).unwrap();
        position.credit(2_500_000_000).unwrap();
        assert_eq!(position.amount, 7_500_000_000);
    }

    #[test]
    fn collateral_debit_requires_balance() {
        let mut position = CollateralPosition::default();
        position.credit(1_000_000_000).unwrap();

        assert!(position.debit(1_000_000_001).is_err());
        assert_eq!(position.amount, 1_000_000_000);

        position.debit(1_000_000_000).unwrap();
        assert_eq!(position.amount, 0);
    }

    #[test]
    fn collateral_credit_overflow_fails() {
        let mut position = CollateralPosition::default();
        position.credit(u64::MAX).unwrap();
        assert!(position.credit(1).is_err());
    }

    #[test]
    fn debt_debit_requires_balance() {
        let mut debt = DebtPosition::default();
        debt.credit(10_000_000_000).unwrap();

        assert!(debt.debit(10_000_000_001).is_err());
        debt.debit(4_000_000_000).unwrap();
        assert_eq!(debt.amount, 6_000_000_000);
    }
}
