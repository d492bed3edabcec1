use {
    crate::{Addr32, Amount, ChainId, Coin, DeliveryOptions, RemoteAsset, SyntheticId, TokenLink},
    serde::{Deserialize, Serialize},
};

// ----------------------------------- types -----------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub owner: Addr32,
    pub local_chain: ChainId,
    pub hub_chain: ChainId,
    /// The hub contract. Inbound messages from anyone else are rejected.
    pub hub: Option<Addr32>,
    /// Vault-wide pause. Blocks deposits but not inbound releases.
    pub paused: bool,
}

/// Link parameters the owner announces for a local token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    pub token: Addr32,
    pub synthetic: SyntheticId,
    pub synthetic_decimals: u8,
    pub min_bridge_amount: Amount,
    pub paused: bool,
}

/// A token the gateway accepts, as recorded locally.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GatewayToken {
    pub token: Addr32,
    pub decimals: u8,
    pub synthetic: SyntheticId,
    pub synthetic_decimals: u8,
    pub decimals_delta: i8,
    pub min_bridge_amount: Amount,
    pub paused: bool,
}

impl GatewayToken {
    /// The link this token forms with its synthetic, as seen from `gateway`.
    pub fn link(&self, remote: RemoteAsset, gateway: Addr32) -> TokenLink {
        TokenLink {
            remote,
            synthetic: self.synthetic,
            decimals_delta: self.decimals_delta,
            min_bridge_amount: self.min_bridge_amount,
            paused: self.paused,
            gateway,
        }
    }
}

// --------------------------------- messages ----------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InstantiateMsg {
    pub owner: Addr32,
    pub hub_chain: ChainId,
    pub hub: Option<Addr32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// Set the hub contract this gateway trusts. Only the hub chain is
    /// accepted as `chain`.
    SetPeer { chain: ChainId, peer: Addr32 },
    SetGatewayPaused { paused: bool },
    SetPaused { token: Addr32, paused: bool },
    SetMinBridgeAmount { token: Addr32, amount: Amount },
    /// Record tokens locally and announce them to the hub.
    LinkTokenToHub {
        configs: Vec<TokenConfig>,
        options: DeliveryOptions,
    },
    /// Lock tokens and have the hub mint their synthetic counterpart to
    /// `recipient`. The attached funds pay the channel fee; the excess is
    /// refunded.
    Deposit {
        recipient: Addr32,
        assets: Vec<Coin>,
        options: DeliveryOptions,
    },
    /// Send custody that is not accounted for as locked to `to`.
    RescueTokens {
        token: Addr32,
        to: Addr32,
        amount: Amount,
    },
}
