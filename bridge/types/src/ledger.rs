use {
    crate::Amount,
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
    thiserror::Error,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("ledger overflow")]
    Overflow,

    #[error("insufficient ledger balance! balance: {balance}, amount: {amount}")]
    Insufficient { balance: Amount, amount: Amount },
}

/// A single balance change, used to stage several changes atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<K> {
    Credit(K, Amount),
    Debit(K, Amount),
}

/// Balance changes that have been checked against a ledger but not yet
/// applied. Produced by [`Ledger::preview`], consumed by [`Ledger::commit`].
#[derive(Debug)]
#[must_use = "a previewed change does nothing until committed"]
pub struct Pending<K> {
    balances: BTreeMap<K, Amount>,
    total: Amount,
    revision: u64,
}

/// Amounts held per key, with a running total. Zero balances are not stored.
///
/// All mutation goes through [`Ledger::preview`] and [`Ledger::commit`]; a
/// debit larger than the balance fails instead of wrapping.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Ledger<K: Ord> {
    balances: BTreeMap<K, Amount>,
    total: Amount,
    #[serde(skip)]
    revision: u64,
}

impl<K: Ord> Default for Ledger<K> {
    fn default() -> Self {
        Self {
            balances: BTreeMap::new(),
            total: 0,
            revision: 0,
        }
    }
}

impl<K> Ledger<K>
where
    K: Ord + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, key: &K) -> Amount {
        self.balances.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Amount)> {
        self.balances.iter()
    }

    /// Check a batch of changes, applied in order, without mutating the ledger.
    pub fn preview<I>(&self, entries: I) -> Result<Pending<K>, LedgerError>
    where
        I: IntoIterator<Item = Entry<K>>,
    {
        let mut balances = BTreeMap::new();
        let mut total = self.total;

        for entry in entries {
            match entry {
                Entry::Credit(key, amount) => {
                    let balance = balances
                        .get(&key)
                        .copied()
                        .unwrap_or_else(|| self.balance_of(&key));
                    let balance = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
                    total = total.checked_add(amount).ok_or(LedgerError::Overflow)?;
                    balances.insert(key, balance);
                },
                Entry::Debit(key, amount) => {
                    let balance = balances
                        .get(&key)
                        .copied()
                        .unwrap_or_else(|| self.balance_of(&key));
                    let balance = balance
                        .checked_sub(amount)
                        .ok_or(LedgerError::Insufficient { balance, amount })?;
                    // The total is at least the sum of the balances.
                    total = total.checked_sub(amount).ok_or(LedgerError::Overflow)?;
                    balances.insert(key, balance);
                },
            }
        }

        Ok(Pending {
            balances,
            total,
            revision: self.revision,
        })
    }

    /// Apply previewed changes. The ledger must not have been mutated since
    /// the preview was taken.
    pub fn commit(&mut self, pending: Pending<K>) {
        debug_assert_eq!(pending.revision, self.revision, "stale ledger preview");

        for (key, balance) in pending.balances {
            if balance == 0 {
                self.balances.remove(&key);
            } else {
                self.balances.insert(key, balance);
            }
        }

        self.total = pending.total;
        self.revision += 1;
    }
}

// ----------------------------------- tests -----------------------------------
