use {
    crate::{Addr32, Amount, ChainId, Coin, DeliveryOptions, RemoteAsset, SyntheticId},
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
};

// ----------------------------------- types -----------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub owner: Addr32,
    pub local_chain: ChainId,
    /// The one gateway trusted per spoke chain.
    pub peers: BTreeMap<ChainId, Addr32>,
}

// --------------------------------- messages ----------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InstantiateMsg {
    pub owner: Addr32,
    pub peers: BTreeMap<ChainId, Addr32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    CreateSyntheticAsset {
        name: String,
        decimals: u8,
    },
    /// Link a remote asset without waiting for the gateway's announcement.
    LinkRemoteToken {
        synthetic: SyntheticId,
        remote: RemoteAsset,
        gateway: Addr32,
        decimals_delta: i8,
        min_bridge_amount: Amount,
    },
    SetPeer {
        chain: ChainId,
        peer: Addr32,
    },
    SetPaused {
        remote: RemoteAsset,
        paused: bool,
    },
    SetMinBridgeAmount {
        remote: RemoteAsset,
        amount: Amount,
    },
    /// Burn synthetic from the sender and release the backing asset on
    /// `dst_chain` to `recipient`, defaulting to the sender.
    BridgeBack {
        synthetic: SyntheticId,
        amount: Amount,
        dst_chain: ChainId,
        recipient: Option<Addr32>,
        options: DeliveryOptions,
    },
    /// Have a gateway release assets without a corresponding burn.
    AdminRescueFromGateway {
        chain: ChainId,
        recipient: Addr32,
        assets: Vec<Coin>,
        options: DeliveryOptions,
    },
    Transfer {
        synthetic: SyntheticId,
        to: Addr32,
        amount: Amount,
    },
}
