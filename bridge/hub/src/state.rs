use {
    bridge_registry::TokenLinkRegistry,
    bridge_types::{hub::Config, Addr32, ChainId, Ledger, Nonce, RemoteAsset, SyntheticId, Versioned},
    std::collections::BTreeMap,
};

/// The authoritative ledger of synthetic supply.
///
/// Three ledgers are kept in step by every mint and burn:
///
/// ```plain
/// sum(balances[synthetic, *]) == supply[synthetic]
///                             == sum(to_synthetic(backing[link])) over the synthetic's links
/// ```
///
/// `backing` is in remote units and mirrors what each gateway holds locked,
/// minus messages in flight.
pub struct Hub {
    pub(crate) address: Addr32,
    pub(crate) config: Versioned<Config>,
    pub(crate) registry: TokenLinkRegistry,
    /// Gateways that announced links, by chain.
    pub(crate) gateways: BTreeMap<ChainId, Addr32>,
    pub(crate) balances: Ledger<(SyntheticId, Addr32)>,
    pub(crate) supply: Ledger<SyntheticId>,
    pub(crate) backing: Ledger<RemoteAsset>,
    /// Highest nonce processed per (source chain, sender).
    pub(crate) processed: BTreeMap<(ChainId, Addr32), Nonce>,
}
