use {
    crate::{Addr32, Amount, ChainId},
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Index of a synthetic asset on the hub. Assigned sequentially from 1.
pub type SyntheticId = u32;

/// Largest supported difference between synthetic and remote decimals. Scaling
/// by `10^39` would overflow a 128-bit amount for every non-zero input.
pub const MAX_DECIMALS_DELTA: i8 = 38;

/// An asset on a specific spoke chain.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RemoteAsset {
    pub chain: ChainId,
    pub address: Addr32,
}

impl RemoteAsset {
    pub const fn new(chain: ChainId, address: Addr32) -> Self {
        Self { chain, address }
    }
}

impl fmt::Display for RemoteAsset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.chain, self.address)
    }
}

/// Immutable description of a synthetic asset, fixed at creation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SyntheticInfo {
    pub id: SyntheticId,
    pub name: String,
    pub decimals: u8,
}

/// A synthetic asset together with its current supply, as returned by queries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SyntheticAsset {
    pub id: SyntheticId,
    pub name: String,
    pub decimals: u8,
    pub total_supply: Amount,
}

/// Mapping and conversion rule between a remote asset and a synthetic asset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenLink {
    pub remote: RemoteAsset,
    pub synthetic: SyntheticId,
    /// `synthetic decimals - remote decimals`.
    pub decimals_delta: i8,
    /// Minimum amount accepted for bridging, in remote units.
    pub min_bridge_amount: Amount,
    pub paused: bool,
    /// The gateway contract custodying the remote asset.
    pub gateway: Addr32,
}

impl TokenLink {
    pub fn decimals_delta(synthetic_decimals: u8, remote_decimals: u8) -> i32 {
        synthetic_decimals as i32 - remote_decimals as i32
    }
}
