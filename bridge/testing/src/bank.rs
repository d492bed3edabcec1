use {
    bridge_types::{Addr32, Amount, Bank, BridgeError, BridgeResult},
    std::collections::BTreeMap,
};

/// In-memory fungible tokens of a spoke chain.
#[derive(Debug, Clone, Default)]
pub struct MockBank {
    decimals: BTreeMap<Addr32, u8>,
    balances: BTreeMap<(Addr32, Addr32), Amount>,
}

impl MockBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_token(&mut self, token: Addr32, decimals: u8) {
        self.decimals.insert(token, decimals);
    }

    /// Create `amount` out of thin air. Panics if the token doesn't exist.
    pub fn mint(&mut self, token: Addr32, to: Addr32, amount: Amount) {
        assert!(self.decimals.contains_key(&token), "unknown token: {token}");

        let balance = self.balances.entry((token, to)).or_default();
        *balance = balance.checked_add(amount).expect("mock bank overflow");
    }

    pub fn total_supply(&self, token: Addr32) -> Amount {
        self.balances
            .iter()
            .filter(|((t, _), _)| *t == token)
            .map(|(_, amount)| *amount)
            .sum()
    }
}

impl Bank for MockBank {
    fn decimals(&self, token: Addr32) -> BridgeResult<u8> {
        self.decimals
            .get(&token)
            .copied()
            .ok_or(BridgeError::UnknownAsset { address: token })
    }

    fn balance_of(&self, token: Addr32, owner: Addr32) -> Amount {
        self.balances.get(&(token, owner)).copied().unwrap_or(0)
    }

    fn transfer(&mut self, token: Addr32, from: Addr32, to: Addr32, amount: Amount) -> BridgeResult<()> {
        self.decimals(token)?;

        let balance = self.balance_of(token, from);
        let remaining = balance
            .checked_sub(amount)
            .ok_or(BridgeError::InsufficientBalance { balance, amount })?;

        if from == to {
            return Ok(());
        }

        let received = self
            .balance_of(token, to)
            .checked_add(amount)
            .ok_or(BridgeError::Overflow)?;

        self.balances.insert((token, from), remaining);
        self.balances.insert((token, to), received);

        Ok(())
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, crate::ResultExt};

    const USDC: Addr32 = Addr32::mock(100);
    const ALICE: Addr32 = Addr32::mock(10);
    const BOB: Addr32 = Addr32::mock(11);

    #[test]
    fn transferring() {
        let mut bank = MockBank::new();
        bank.create_token(USDC, 6);
        bank.mint(USDC, ALICE, 100);

        bank.transfer(USDC, ALICE, BOB, 101)
            .should_fail_with_error("insufficient balance");

        bank.transfer(USDC, ALICE, BOB, 60).should_succeed();

        assert_eq!(bank.balance_of(USDC, ALICE), 40);
        assert_eq!(bank.balance_of(USDC, BOB), 60);
        assert_eq!(bank.total_supply(USDC), 100);
    }

    #[test]
    fn unknown_token() {
        let mut bank = MockBank::new();

        bank.decimals(USDC).should_fail_with_error("not known to the local bank");
        bank.transfer(USDC, ALICE, BOB, 0)
            .should_fail_with_error("not known to the local bank");
    }
}
