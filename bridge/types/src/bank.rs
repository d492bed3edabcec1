use crate::{Addr32, Amount, BridgeResult};

/// The fungible-token facility of a spoke chain, through which the gateway
/// pulls deposits in and pays releases out.
pub trait Bank {
    /// Fails with `UnknownAsset` if the token does not exist.
    fn decimals(&self, token: Addr32) -> BridgeResult<u8>;

    fn balance_of(&self, token: Addr32, owner: Addr32) -> Amount;

    /// Fails with `InsufficientBalance` without moving anything if `from`
    /// holds less than `amount`.
    fn transfer(&mut self, token: Addr32, from: Addr32, to: Addr32, amount: Amount) -> BridgeResult<()>;
}
