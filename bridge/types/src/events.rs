use {
    crate::{
        Addr20, Addr32, Amount, Asset, ChainId, Coin, FeeSchedule, Hash256, Lane, LinkConfig,
        Nonce, RemoteAsset, SyntheticId, TokenLink, VerifierSet,
    },
    serde::{Deserialize, Serialize},
};

/// Audit trail of state changes. Every owner-gated operation, rescue and
/// ledger mutation emits exactly one of these.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    // --------------------------------- channel -------------------------------
    AttestationSubmitted {
        message_id: Hash256,
        verifier: Addr20,
        confirmations: u64,
    },
    PacketVerified {
        lane: Lane,
        nonce: Nonce,
        payload_hash: Hash256,
    },
    PacketDelivered {
        lane: Lane,
        nonce: Nonce,
        message_id: Hash256,
    },
    PacketSkipped {
        lane: Lane,
        nonce: Nonce,
        caller: Addr32,
    },
    FeeScheduleSet {
        dst_chain: ChainId,
        schedule: FeeSchedule,
    },
    PathPaused {
        dst_chain: ChainId,
        paused: bool,
    },
    ReceiveConfigSet {
        receiver: Option<Addr32>,
        src_chain: ChainId,
        verifiers: VerifierSet,
    },
    DelegateSet {
        receiver: Addr32,
        delegate: Option<Addr32>,
    },

    // -------------------------------- registry -------------------------------
    SyntheticAssetCreated {
        synthetic: SyntheticId,
        name: String,
        decimals: u8,
    },
    TokenLinked {
        link: TokenLink,
    },
    LinkPaused {
        asset: RemoteAsset,
        paused: bool,
    },
    MinBridgeAmountSet {
        asset: RemoteAsset,
        amount: Amount,
    },

    // ----------------------------------- hub ---------------------------------
    PeerSet {
        chain: ChainId,
        peer: Addr32,
    },
    GatewayRegistered {
        chain: ChainId,
        gateway: Addr32,
    },
    SyntheticMinted {
        synthetic: SyntheticId,
        recipient: Addr32,
        amount: Amount,
        backing: RemoteAsset,
    },
    SyntheticBurned {
        synthetic: SyntheticId,
        owner: Addr32,
        amount: Amount,
    },
    SyntheticTransferred {
        synthetic: SyntheticId,
        from: Addr32,
        to: Addr32,
        amount: Amount,
    },
    BridgedBack {
        synthetic: SyntheticId,
        dst_chain: ChainId,
        recipient: Addr32,
        remote_amount: Amount,
        nonce: Nonce,
    },
    AdminRescueSent {
        dst_chain: ChainId,
        recipient: Addr32,
        assets: Vec<Coin>,
        nonce: Nonce,
    },

    // --------------------------------- gateway -------------------------------
    Deposited {
        sender: Addr32,
        recipient: Addr32,
        assets: Vec<Asset>,
        nonce: Nonce,
    },
    LinkTokensSent {
        configs: Vec<LinkConfig>,
        nonce: Nonce,
    },
    Released {
        token: Addr32,
        recipient: Addr32,
        amount: Amount,
    },
    AdminRescueReceived {
        recipient: Addr32,
        assets: Vec<Coin>,
    },
    TokensRescued {
        token: Addr32,
        to: Addr32,
        amount: Amount,
    },
    GatewayPaused {
        paused: bool,
    },
}
