use {
    crate::{Addr20, Addr32, Amount, BridgeError, BridgeResult, ChainId, Hash256, Lane, Nonce, Response},
    serde::{Deserialize, Serialize},
    std::collections::{BTreeMap, BTreeSet},
    strum_macros::Display,
};

/// Caller-chosen parameters for delivering a message on the destination chain.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryOptions {
    /// Gas the executor must provide to the receiver's handler.
    pub gas_limit: u64,
    /// Native currency the executor forwards to the receiver.
    pub native_drop: Amount,
}

/// Per-destination pricing of the channel.
///
/// ```plain
/// fee = base_fee + per_byte_fee * len(payload) + gas_limit * gas_price + native_drop
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeSchedule {
    pub base_fee: Amount,
    pub per_byte_fee: Amount,
    pub gas_price: Amount,
}

impl FeeSchedule {
    pub fn quote(&self, payload_len: usize, options: &DeliveryOptions) -> BridgeResult<Amount> {
        let bytes_fee = self
            .per_byte_fee
            .checked_mul(payload_len as Amount)
            .ok_or(BridgeError::Overflow)?;

        let gas_fee = self
            .gas_price
            .checked_mul(options.gas_limit as Amount)
            .ok_or(BridgeError::Overflow)?;

        [bytes_fee, gas_fee, options.native_drop]
            .into_iter()
            .try_fold(self.base_fee, |acc, part| acc.checked_add(part))
            .ok_or(BridgeError::Overflow)
    }
}

/// Returned by the channel when a message is accepted for relay.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub nonce: Nonce,
    pub message_id: Hash256,
    pub dst_chain: ChainId,
    /// The fee retained by the channel.
    pub fee: Amount,
    /// Payment in excess of the fee, returned to the sender.
    pub refund: Amount,
}

/// The verifier quorum a receiver requires for messages from one source chain.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerifierSet {
    pub threshold: u32,
    pub verifiers: BTreeSet<Addr20>,
    /// Minimum number of source-chain confirmations an attestation must claim.
    pub confirmations: u64,
}

impl VerifierSet {
    pub fn validate(&self) -> BridgeResult<()> {
        if self.threshold == 0 {
            return Err(BridgeError::InvalidVerifierSet {
                reason: "threshold must be non-zero".to_string(),
            });
        }

        if self.threshold as usize > self.verifiers.len() {
            return Err(BridgeError::InvalidVerifierSet {
                reason: format!(
                    "threshold ({}) exceeds the number of verifiers ({})",
                    self.threshold,
                    self.verifiers.len()
                ),
            });
        }

        Ok(())
    }
}

/// Delivery-side state of a single packet.
#[derive(Serialize, Deserialize, Display, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PacketState {
    Unverified,
    Verified,
    Executed,
    Skipped,
}

/// Progress of a lane on the receiving side.
///
/// `last_verified_nonce` is the lazy nonce: the end of the contiguous run of
/// nonces that are verified or already executed. `last_executed_nonce` is the
/// inbound nonce. Their difference is the number of messages verified but not
/// yet executed.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LaneStatus {
    pub last_verified_nonce: Nonce,
    pub last_executed_nonce: Nonce,
    pub pending: u64,
    pub skipped: Vec<Nonce>,
}

/// Who has attested to a message and whether that satisfies the receiver's
/// configured verifier set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerificationStatus {
    pub message_id: Hash256,
    pub state: PacketState,
    pub required: VerifierSet,
    /// Every recovered attester and the confirmations it claimed.
    pub attested: BTreeMap<Addr20, u64>,
    /// Configured verifiers with no sufficient attestation.
    pub missing: BTreeSet<Addr20>,
    /// Attesters that are not part of the configured set.
    pub unknown: BTreeSet<Addr20>,
    pub quorum_reached: bool,
}

/// Sending side of the transport, as seen by the bridge contracts.
pub trait MessageChannel {
    fn local_chain(&self) -> ChainId;

    /// The fee `send` would charge right now. No state change.
    fn quote(
        &self,
        dst_chain: ChainId,
        receiver: Addr32,
        payload: &[u8],
        options: &DeliveryOptions,
    ) -> BridgeResult<Amount>;

    /// Assign the next nonce of the lane and queue the message for relay.
    fn send(
        &mut self,
        sender: Addr32,
        dst_chain: ChainId,
        receiver: Addr32,
        payload: Vec<u8>,
        options: &DeliveryOptions,
        payment: Amount,
    ) -> BridgeResult<SendReceipt>;
}

/// Receiving side of the transport. The channel calls this exactly once per
/// nonce, in nonce order, and only after the message is verified. Returning
/// an error leaves the message verified so that it can be retried.
pub trait MessageReceiver {
    fn address(&self) -> Addr32;

    fn on_message(&mut self, lane: &Lane, nonce: Nonce, payload: &[u8]) -> BridgeResult<Response>;
}

// ----------------------------------- tests -----------------------------------
