use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::CitadelError;
use crate::oracle;
use crate::state::{CollateralPosition, EngineConfig};

/// One registered asset's balance and price for a single user, captured at
/// the top of an instruction
pub struct AssetSnapshot {
    pub mint: Pubkey,
    pub decimals: u8,

    /// User's deposited amount in the mint's base units
    pub amount: u64,

    /// USD per whole token, 18 decimals
    pub unit_price: u128,
}

/// Walk the collateral registry and capture the user's balance and the
/// oracle price of every registered asset.
///
/// `accounts` must hold, in registry order, the user's collateral position
/// PDA followed by the asset's price update account. A position that has
/// never been deposited into reads as zero.
pub fn collect_positions<'info>(
    config: &EngineConfig,
    user: &Pubkey,
    accounts: &[AccountInfo<'info>],
    clock: &Clock,
) -> Result<Vec<AssetSnapshot>> {
    require!(
        accounts.len() >= config.collaterals.len() * 2,
        CitadelError::MissingCollateralAccounts
    );

    let mut snapshots = Vec::with_capacity(config.collaterals.len());
    for (entry, pair) in config.collaterals.iter().zip(accounts.chunks(2)) {
        let position_info = &pair[0];
        let feed_info = &pair[1];

        let (expected, _) = Pubkey::find_program_address(
            &[
                COLLATERAL_POSITION_SEED,
                user.as_ref(),
                entry.mint.as_ref(),
            ],
            &crate::ID,
        );
        require_keys_eq!(
            *position_info.key,
            expected,
            CitadelError::InvalidCollateralAccount
        );

        let amount = if position_info.data_is_empty() {
            0
        } else {
            let data = position_info.try_borrow_data()?;
            CollateralPosition::try_deserialize(&mut &data[..])?.amount
        };

        let unit_price = oracle::read_unit_price(feed_info, &entry.price_feed_id, clock)?;

        snapshots.push(AssetSnapshot {
            mint: entry.mint,
            decimals: entry.decimals,
            amount,
            unit_price,
        });
    }

    Ok(snapshots)
}

/// Total USD value (18 decimals) of the captured collateral, skipping
/// zero balances
pub fn total_collateral_value(snapshots: &[AssetSnapshot]) -> Result<u128> {
    let mut total: u128 = 0;
    for snapshot in snapshots.iter().filter(|snapshot| snapshot.amount > 0) {
        let value = collateral_value(snapshot.amount, snapshot.decimals, snapshot.unit_price)?;
        total = total
            .checked_add(value)
            .ok_or(CitadelError::MathOverflow)?;
    }
    Ok(total)
}

/// USD value (18 decimals) of `amount` base units of a collateral mint
pub fn collateral_value(amount: u64, decimals: u8, unit_price: u128) -> Result<u128> {
    let value = (amount as u128)
        .checked_mul(unit_price)
        .and_then(|value| {
            10u128
                .checked_pow(decimals as u32)
                .and_then(|scale| value.checked_div(scale))
        })
        .ok_or(CitadelError::MathOverflow)?;
    Ok(value)
}

/// USD value (18 decimals) of a cUSD debt amount; cUSD is pegged at $1
pub fn debt_value(amount: u64) -> Result<u128> {
    let scale = 10u128.pow(ACCOUNTING_DECIMALS - CUSD_DECIMALS as u32);
    let value = (amount as u128)
        .checked_mul(scale)
        .ok_or(CitadelError::MathOverflow)?;
    Ok(value)
}

/// Solvency check: half the collateral value must cover the debt.
///
/// Zero debt is healthy. The comparison is exact, with no intermediate
/// division, and a position sitting exactly on the threshold is healthy.
pub fn is_healthy(total_collateral_value: u128, debt_value: u128) -> Result<bool> {
    if debt_value == 0 {
        return Ok(true);
    }

    let capacity = total_collateral_value
        .checked_mul(LIQUIDATION_THRESHOLD)
        .ok_or(CitadelError::MathOverflow)?;
    let required = debt_value
        .checked_mul(PERCENT_DIVISOR)
        .ok_or(CitadelError::MathOverflow)?;

    Ok(capacity >= required)
}

/// Collateral base units owed to a liquidator for repaying `repaid_value`
/// USD of debt, including the liquidation bonus
pub fn seizure_amount(repaid_value: u128, unit_price: u128, decimals: u8) -> Result<u64> {
    require!(unit_price > 0, CitadelError::InvalidOraclePrice);

    let gross_value = repaid_value
        .checked_mul(PERCENT_DIVISOR + LIQUIDATION_BONUS)
        .and_then(|value| value.checked_div(PERCENT_DIVISOR))
        .ok_or(CitadelError::MathOverflow)?;

    let units = gross_value
        .checked_mul(10u128.checked_pow(decimals as u32).ok_or(CitadelError::MathOverflow)?)
        .and_then(|value| value.checked_div(unit_price))
        .ok_or(CitadelError::MathOverflow)?;

    u64::try_from(units).map_err(|_| error!(CitadelError::MathOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICE_2000: u128 = 2_000 * PRECISION;

    fn snapshot(amount: u64, unit_price: u128) -> AssetSnapshot {
        AssetSnapshot {
            mint: Pubkey::new_unique(),
            decimals: 9,
            amount,
            unit_price,
        }
    }

    #[test]
    fn values_collateral_at_the_accounting_scale() {
        // 15 units of a 9-decimal mint at $2000
        let value = collateral_value(15_000_000_000, 9, PRICE_2000).unwrap();
        assert_eq!(value, 30_000 * PRECISION);
    }

    #[test]
    fn sums_across_assets_and_skips_zero_balances() {
        let snapshots = [
            snapshot(15_000_000_000, PRICE_2000),
            snapshot(0, 0), // never deposited: no price was read
            snapshot(2_000_000_000, 50 * PRECISION),
        ];
        let total = total_collateral_value(&snapshots).unwrap();
        assert_eq!(total, 30_100 * PRECISION);
    }

    #[test]
    fn debt_is_rebased_from_cusd_decimals() {
        assert_eq!(debt_value(10_000_000_000_000).unwrap(), 10_000 * PRECISION);
    }

    #[test]
    fn zero_debt_is_healthy() {
        assert!(is_healthy(0, 0).unwrap());
        assert!(is_healthy(30_000 * PRECISION, 0).unwrap());
    }

    #[test]
    fn threshold_is_inclusive() {
        let total = 30_000 * PRECISION;

        // Exactly half the collateral value is still healthy
        let debt_at_line = debt_value(15_000_000_000_000).unwrap();
        assert!(is_healthy(total, debt_at_line).unwrap());

        // One cUSD base unit more is not
        let debt_over = debt_value(15_000_000_000_001).unwrap();
        assert!(!is_healthy(total, debt_over).unwrap());
    }

    #[test]
    fn mint_capacity_scenario() {
        // 15 units at $2000 back up to 15_000 cUSD
        let total = collateral_value(15_000_000_000, 9, PRICE_2000).unwrap();
        assert!(is_healthy(total, debt_value(10_000_000_000_000).unwrap()).unwrap());
        assert!(!is_healthy(total, debt_value(15_001_000_000_000).unwrap()).unwrap());
    }

    #[test]
    fn burn_and_withdraw_scenario_lands_exactly_on_the_line() {
        // 10 units at $2000, 10_000 cUSD minted, then burn 5_000 and
        // withdraw 5 units: the remainder is healthy at exactly 200%
        let remaining = collateral_value(5_000_000_000, 9, PRICE_2000).unwrap();
        let debt = debt_value(5_000_000_000_000).unwrap();
        assert!(is_healthy(remaining, debt).unwrap());
        assert!(!is_healthy(remaining - 1, debt).unwrap());
    }

    #[test]
    fn seizure_includes_the_bonus() {
        // Repaying $1000 of debt at $2000/unit seizes 0.55 units
        let repaid = debt_value(1_000_000_000_000).unwrap();
        let seized = seizure_amount(repaid, PRICE_2000, 9).unwrap();
        assert_eq!(seized, 550_000_000);
    }

    #[test]
    fn seizure_rejects_zero_price() {
        assert!(seizure_amount(PRECISION, 0, 9).is_err());
    }

    #[test]
    fn read_only_math_leaves_inputs_untouched() {
        let snapshots = [snapshot(15_000_000_000, PRICE_2000)];
        let first = total_collateral_value(&snapshots).unwrap();
        let second = total_collateral_value(&snapshots).unwrap();
        assert_eq!(first, second);
        assert_eq!(snapshots[0].amount, 15_000_000_000);
    }
}
