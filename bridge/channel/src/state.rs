use {
    bridge_types::{
        endpoint::Config, Addr20, Addr32, Amount, Hash256, Lane, Message, Nonce, Versioned,
    },
    serde::{Deserialize, Serialize},
    std::collections::{BTreeMap, VecDeque},
};

/// A message waiting to be picked up by relayers, stamped with the block
/// height at which it was sent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OutboundPacket {
    pub message: Message,
    pub block_height: u64,
}

/// Confirmations claimed by each recovered attester.
pub(crate) type Attesters = BTreeMap<Addr20, u64>;

/// Receiving-side progress of one lane.
#[derive(Debug, Clone, Default)]
pub(crate) struct InboundLane {
    /// Highest nonce that is executed or skipped. Every lower nonce is too.
    pub executed_nonce: Nonce,
    /// Payload hashes of verified, not yet executed nonces.
    pub verified: BTreeMap<Nonce, Hash256>,
    pub skipped: Vec<Nonce>,
}

/// The message channel endpoint of one chain. Handles both directions: it
/// assigns nonces to outbound messages and runs the verification and
/// execution state machine for inbound ones.
pub struct Endpoint {
    pub(crate) config: Versioned<Config>,
    pub(crate) block_height: u64,
    /// Last assigned nonce per outbound lane.
    pub(crate) outbound_nonces: BTreeMap<Lane, Nonce>,
    pub(crate) inbound: BTreeMap<Lane, InboundLane>,
    /// Recovered attesters and the confirmations they claimed, by lane and
    /// nonce, then by message id. Dropped once the nonce is executed or skipped.
    pub(crate) attestations: BTreeMap<(Lane, Nonce), BTreeMap<Hash256, Attesters>>,
    pub(crate) outbox: VecDeque<OutboundPacket>,
    pub(crate) fees_collected: Amount,
    pub(crate) delegates: BTreeMap<Addr32, Addr32>,
}
