use anchor_lang::prelude::*;
use pyth_solana_receiver_sdk::price_update::{get_feed_id_from_hex, PriceUpdateV2};

use crate::constants::*;
use crate::errors::CitadelError;

/// Read the USD price of one whole collateral token, re-based to the
/// 18-decimal accounting scale.
///
/// The account must be a Pyth `PriceUpdateV2` owned by the receiver
/// program, match the registered feed id, and be no older than
/// `MAX_PRICE_AGE_SECS`. Non-positive readings are rejected.
pub fn read_unit_price<'info>(
    feed_info: &AccountInfo<'info>,
    price_feed_id: &str,
    clock: &Clock,
) -> Result<u128> {
    let price_update = Account::<PriceUpdateV2>::try_from(feed_info)?;
    let feed_id = get_feed_id_from_hex(price_feed_id)?;
    let price = price_update
        .get_price_no_older_than(clock, MAX_PRICE_AGE_SECS, &feed_id)
        .map_err(|_| CitadelError::StalePrice)?;
    scale_price(price.price, price.exponent)
}

/// Re-base a raw oracle reading `price * 10^exponent` to the accounting
/// scale. This is the only place oracle decimals are reconciled with
/// ledger decimals.
pub fn scale_price(price: i64, exponent: i32) -> Result<u128> {
    require!(price > 0, CitadelError::InvalidOraclePrice);
    let price = price as u128;

    let scaled = if exponent >= 0 {
        let shift = 10u128
            .checked_pow(ACCOUNTING_DECIMALS + exponent as u32)
            .ok_or(CitadelError::MathOverflow)?;
        price.checked_mul(shift)
    } else {
        let expo = exponent.unsigned_abs();
        if expo <= ACCOUNTING_DECIMALS {
            price.checked_mul(10u128.pow(ACCOUNTING_DECIMALS - expo))
        } else {
            let divisor = 10u128
                .checked_pow(expo - ACCOUNTING_DECIMALS)
                .ok_or(CitadelError::MathOverflow)?;
            price.checked_div(divisor)
        }
    };

    Ok(scaled.ok_or(CitadelError::MathOverflow)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_reference_feed_to_accounting_decimals() {
        // $2000.00000000 at the usual exponent of -8
        let scaled = scale_price(200_000_000_000, -8).unwrap();
        assert_eq!(scaled, 2_000 * PRECISION);
    }

    #[test]
    fn scales_whole_unit_readings() {
        assert_eq!(scale_price(3, 0).unwrap(), 3 * PRECISION);
        assert_eq!(scale_price(5, 2).unwrap(), 500 * PRECISION);
    }

    #[test]
    fn scales_sub_accounting_exponents_down() {
        // 10^-20 readings lose the digits below the accounting scale
        assert_eq!(scale_price(1_234, -20).unwrap(), 12);
    }

    #[test]
    fn rejects_non_positive_readings() {
        assert!(scale_price(0, -8).is_err());
        assert!(scale_price(-42, -8).is_err());
    }

    #[test]
    fn overflow_is_reported_not_wrapped() {
        assert!(scale_price(i64::MAX, 20).is_err());
    }
}
