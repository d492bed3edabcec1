use bridge_types::{Amount, BridgeError, BridgeResult, TokenLink, MAX_DECIMALS_DELTA};

fn pow10(exp: u32) -> BridgeResult<Amount> {
    10u128.checked_pow(exp).ok_or(BridgeError::Overflow)
}

pub fn check_decimals_delta(delta: i32) -> BridgeResult<i8> {
    if delta.abs() > MAX_DECIMALS_DELTA as i32 {
        return Err(BridgeError::DecimalsOutOfRange { delta });
    }

    Ok(delta as i8)
}

/// Scale `amount` by `10^delta`. Fails instead of truncating when `delta` is
/// negative and `amount` is not a multiple of the divisor.
fn scale(amount: Amount, delta: i8) -> BridgeResult<Amount> {
    let factor = pow10(delta.unsigned_abs() as u32)?;

    if delta >= 0 {
        amount.checked_mul(factor).ok_or(BridgeError::Overflow)
    } else if amount % factor == 0 {
        Ok(amount / factor)
    } else {
        Err(BridgeError::PrecisionLoss { amount, delta })
    }
}

/// Exact conversion from remote units to synthetic units.
pub fn remote_to_synthetic(decimals_delta: i8, amount: Amount) -> BridgeResult<Amount> {
    scale(amount, decimals_delta)
}

/// Exact conversion from synthetic units to remote units. The inverse of
/// [`remote_to_synthetic`].
pub fn synthetic_to_remote(decimals_delta: i8, amount: Amount) -> BridgeResult<Amount> {
    let inverse = decimals_delta.checked_neg().ok_or(BridgeError::Overflow)?;

    scale(amount, inverse)
}

/// Truncate a remote amount to the largest value that converts to synthetic
/// units without remainder.
pub fn remove_dust_remote(decimals_delta: i8, amount: Amount) -> BridgeResult<Amount> {
    if decimals_delta >= 0 {
        return Ok(amount);
    }

    let factor = pow10(decimals_delta.unsigned_abs() as u32)?;

    Ok(amount - amount % factor)
}

/// Truncate a synthetic amount to the largest value that converts to remote
/// units without remainder.
pub fn remove_dust_synthetic(decimals_delta: i8, amount: Amount) -> BridgeResult<Amount> {
    if decimals_delta <= 0 {
        return Ok(amount);
    }

    let factor = pow10(decimals_delta as u32)?;

    Ok(amount - amount % factor)
}

/// Convert a deposit amount, enforcing the link's minimum. Amounts that would
/// convert to zero are rejected, never rounded.
pub fn convert_remote_to_synthetic(link: &TokenLink, remote_amount: Amount) -> BridgeResult<Amount> {
    if remote_amount < link.min_bridge_amount || remote_amount == 0 {
        return Err(BridgeError::AmountTooSmall {
            amount: remote_amount,
            min: link.min_bridge_amount,
        });
    }

    let synthetic_amount = remote_to_synthetic(link.decimals_delta, remote_amount)?;

    if synthetic_amount == 0 {
        return Err(BridgeError::AmountTooSmall {
            amount: remote_amount,
            min: link.min_bridge_amount,
        });
    }

    Ok(synthetic_amount)
}

/// Convert a bridge-back amount, enforcing the link's minimum on the remote
/// side.
pub fn convert_synthetic_to_remote(link: &TokenLink, synthetic_amount: Amount) -> BridgeResult<Amount> {
    let remote_amount = synthetic_to_remote(link.decimals_delta, synthetic_amount)?;

    if remote_amount < link.min_bridge_amount || remote_amount == 0 {
        return Err(BridgeError::AmountTooSmall {
            amount: remote_amount,
            min: link.min_bridge_amount,
        });
    }

    Ok(remote_amount)
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        bridge_types::{Addr32, RemoteAsset},
        proptest::prelude::*,
        test_case::test_case,
    };

    fn mock_link(decimals_delta: i8, min_bridge_amount: Amount) -> TokenLink {
        TokenLink {
            remote: RemoteAsset::new(30101, Addr32::mock(1)),
            synthetic: 1,
            decimals_delta,
            min_bridge_amount,
            paused: false,
            gateway: Addr32::mock(2),
        }
    }

    #[test_case(0, 2_000_000 => Ok(2_000_000) ; "same decimals")]
    #[test_case(12, 1 => Ok(1_000_000_000_000) ; "6 to 18 decimals")]
    #[test_case(-12, 5_000_000_000_000 => Ok(5) ; "18 to 6 decimals")]
    #[test_case(-12, 5_000_000_000_001 => Err(BridgeError::PrecisionLoss { amount: 5_000_000_000_001, delta: -12 }) ; "inexact division")]
    #[test_case(38, 4 => Err(BridgeError::Overflow) ; "overflow")]
    fn converting_remote_to_synthetic(delta: i8, amount: Amount) -> BridgeResult<Amount> {
        remote_to_synthetic(delta, amount)
    }

    #[test_case(-12, 1_234_567_890_123_456 => 1_234_567_000_000_000 ; "dust below remote precision")]
    #[test_case(0, 1_234 => 1_234 ; "nothing to remove")]
    #[test_case(6, 1_234 => 1_234 ; "scaling up never loses precision")]
    fn removing_remote_dust(delta: i8, amount: Amount) -> Amount {
        remove_dust_remote(delta, amount).unwrap()
    }

    #[test]
    fn removing_synthetic_dust() {
        assert_eq!(remove_dust_synthetic(12, 1_500_000_000_000_123).unwrap(), 1_500_000_000_000_000);
        assert_eq!(remove_dust_synthetic(-12, 7).unwrap(), 7);
    }

    #[test]
    fn below_minimum_is_rejected() {
        let link = mock_link(0, 1_000_000);

        assert_eq!(
            convert_remote_to_synthetic(&link, 500_000),
            Err(BridgeError::AmountTooSmall {
                amount: 500_000,
                min: 1_000_000
            })
        );
        assert_eq!(convert_remote_to_synthetic(&link, 1_000_000), Ok(1_000_000));
    }

    #[test]
    fn zero_is_rejected_without_minimum() {
        let link = mock_link(0, 0);

        assert!(matches!(
            convert_remote_to_synthetic(&link, 0),
            Err(BridgeError::AmountTooSmall { .. })
        ));
        assert!(matches!(
            convert_synthetic_to_remote(&link, 0),
            Err(BridgeError::AmountTooSmall { .. })
        ));
    }

    #[test_case(38 => true ; "upper bound")]
    #[test_case(-38 => true ; "lower bound")]
    #[test_case(39 => false ; "above upper bound")]
    #[test_case(-200 => false ; "far below lower bound")]
    fn bounding_decimals_delta(delta: i32) -> bool {
        check_decimals_delta(delta).is_ok()
    }

    proptest! {
        /// Scaling up and back down is lossless for every amount that does not
        /// overflow.
        #[test]
        fn round_trip_with_non_negative_delta(
            delta in 0i8..=18,
            remote_amount in 1u128..=u64::MAX as u128,
        ) {
            let link = mock_link(delta, 1);
            let synthetic_amount = convert_remote_to_synthetic(&link, remote_amount).unwrap();

            prop_assert_eq!(convert_synthetic_to_remote(&link, synthetic_amount).unwrap(), remote_amount);
        }

        /// With a negative delta the round trip loses exactly the dust, and
        /// never rounds a dust-free amount at or above the minimum to zero.
        #[test]
        fn round_trip_with_negative_delta(
            delta in -18i8..0,
            remote_amount in 1u128..=u64::MAX as u128,
        ) {
            let factor = 10u128.pow(delta.unsigned_abs() as u32);
            let link = mock_link(delta, factor);
            let cleaned = remove_dust_remote(delta, remote_amount).unwrap();

            prop_assert!(remote_amount - cleaned < factor);

            if cleaned >= link.min_bridge_amount {
                let synthetic_amount = convert_remote_to_synthetic(&link, cleaned).unwrap();
                prop_assert!(synthetic_amount > 0);
                prop_assert_eq!(convert_synthetic_to_remote(&link, synthetic_amount).unwrap(), cleaned);
            } else {
                prop_assert!(convert_remote_to_synthetic(&link, cleaned).is_err());
            }
        }
    }
}
