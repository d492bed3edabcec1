use {
    bridge_types::{
        gateway::{Config, GatewayToken},
        Addr32, ChainId, Ledger, Nonce, Versioned,
    },
    std::collections::BTreeMap,
};

/// The custodian of real assets on a spoke chain.
pub struct Gateway<B> {
    pub(crate) address: Addr32,
    pub(crate) config: Versioned<Config>,
    /// Tokens announced to the hub, by local token address.
    pub(crate) tokens: BTreeMap<Addr32, GatewayToken>,
    /// Custody backing synthetic supply on the hub.
    pub(crate) locked: Ledger<Addr32>,
    /// Highest nonce processed per (source chain, sender).
    pub(crate) processed: BTreeMap<(ChainId, Addr32), Nonce>,
    pub(crate) bank: B,
}
