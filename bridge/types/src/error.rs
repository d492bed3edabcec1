use {
    crate::{Addr20, Addr32, Amount, ChainId, Nonce, PayloadKind, RemoteAsset, SyntheticId},
    serde::{Deserialize, Serialize},
    strum_macros::Display,
    thiserror::Error,
};

/// The four kinds of failure the bridge distinguishes.
///
/// - `Configuration`: the call is rejected because of how the bridge is set up
///   (unlinked token, wrong peer, paused path). Fixed by an admin.
/// - `Economic`: the call is rejected because of amounts (below minimum, not
///   enough balance, not enough fee). State is unchanged.
/// - `Liveness`: a message is stuck somewhere between sent and executed. Not a
///   safety problem; resolved by retrying or reconfiguring.
/// - `Invariant`: an accounting invariant would be broken. Must be unreachable;
///   if observed, requires an admin rescue.
#[derive(Serialize, Deserialize, Display, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorClass {
    Configuration,
    Economic,
    Liveness,
    Invariant,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    // ------------------------------ configuration ----------------------------
    #[error("sender is not the owner! sender: {sender}, owner: {owner}")]
    NotOwner { sender: Addr32, owner: Addr32 },

    #[error("sender does not have permission to perform this action! sender: {sender}")]
    Unauthorized { sender: Addr32 },

    #[error("message sender is not the trusted peer! chain: {chain}, expecting: {expect}, got: {got}")]
    UntrustedPeer {
        chain: ChainId,
        expect: Addr32,
        got: Addr32,
    },

    #[error("no peer is configured for chain {chain}")]
    NoPeer { chain: ChainId },

    #[error("token is not linked: {asset}")]
    TokenNotLinked { asset: RemoteAsset },

    #[error("token is paused: {asset}")]
    TokenPaused { asset: RemoteAsset },

    #[error("gateway is paused")]
    GatewayPaused,

    #[error("channel path is paused! source: {src}, destination: {dst}")]
    ChannelPaused { src: ChainId, dst: ChainId },

    #[error("no fee schedule is configured for destination chain {chain}")]
    UnknownDestination { chain: ChainId },

    #[error("synthetic asset {synthetic} is not linked to chain {chain}")]
    NoLinkForChain { synthetic: SyntheticId, chain: ChainId },

    #[error("synthetic asset does not exist: {synthetic}")]
    UnknownSynthetic { synthetic: SyntheticId },

    #[error("synthetic asset with name `{name}` already exists")]
    AlreadyExists { name: String },

    #[error("remote asset is already linked: {asset}")]
    AlreadyLinked { asset: RemoteAsset },

    #[error("synthetic asset {synthetic} is already linked to another asset on chain {chain}")]
    SyntheticAlreadyLinkedOnChain { synthetic: SyntheticId, chain: ChainId },

    #[error("decimals mismatch for synthetic asset {synthetic}! expecting: {expect}, got: {got}")]
    DecimalsMismatch {
        synthetic: SyntheticId,
        expect: u8,
        got: u8,
    },

    #[error("decimals difference out of range: {delta}")]
    DecimalsOutOfRange { delta: i32 },

    #[error("asset is not known to the local bank: {address}")]
    UnknownAsset { address: Addr32 },

    #[error("message is destined for another chain! expecting: {expect}, got: {got}")]
    WrongDestination { expect: ChainId, got: ChainId },

    #[error("message is destined for another receiver! expecting: {expect}, got: {got}")]
    WrongReceiver { expect: Addr32, got: Addr32 },

    #[error("asset belongs to another chain! expecting: {expect}, got: {got}")]
    AssetChainMismatch { expect: ChainId, got: ChainId },

    #[error("unexpected payload: {kind}")]
    UnexpectedPayload { kind: PayloadKind },

    #[error("no assets provided")]
    NoAssets,

    #[error("invalid verifier set: {reason}")]
    InvalidVerifierSet { reason: String },

    #[error("invalid encoding: {reason}")]
    InvalidEncoding { reason: String },

    // -------------------------------- economic -------------------------------
    #[error("insufficient fee! required: {required}, provided: {provided}")]
    InsufficientFee { required: Amount, provided: Amount },

    #[error("amount is below the minimum bridge amount! amount: {amount}, minimum: {min}")]
    AmountTooSmall { amount: Amount, min: Amount },

    #[error("insufficient balance! balance: {balance}, amount: {amount}")]
    InsufficientBalance { balance: Amount, amount: Amount },

    #[error("insufficient backing for {asset}! backing: {backing}, amount: {amount}")]
    InsufficientBacking {
        asset: RemoteAsset,
        backing: Amount,
        amount: Amount,
    },

    #[error("rescue exceeds unaccounted custody of {asset}! surplus: {surplus}, amount: {amount}")]
    InsufficientCustody {
        asset: Addr32,
        surplus: Amount,
        amount: Amount,
    },

    // -------------------------------- liveness -------------------------------
    #[error("message is not verified! nonce: {nonce}")]
    NotVerified { nonce: Nonce },

    #[error("message is out of order! expecting nonce: {expect}, got: {got}")]
    OutOfOrder { expect: Nonce, got: Nonce },

    #[error("verifier quorum not reached! have: {have}, need: {need}")]
    QuorumNotReached { have: usize, need: usize },

    #[error("payload does not match the verified hash! nonce: {nonce}")]
    PayloadHashMismatch { nonce: Nonce },

    #[error("signature does not recover to a valid verifier: {reason}")]
    InvalidSignature { reason: String },

    #[error("verifier {verifier} has not attested")]
    MissingAttestation { verifier: Addr20 },

    // -------------------------------- invariant ------------------------------
    #[error("insufficient locked balance of {asset}! locked: {locked}, amount: {amount}")]
    InsufficientLockedBalance {
        asset: Addr32,
        locked: Amount,
        amount: Amount,
    },

    #[error("arithmetic overflow")]
    Overflow,

    #[error("conversion loses precision! amount: {amount}, decimals delta: {delta}")]
    PrecisionLoss { amount: Amount, delta: i8 },

    #[error("supply of synthetic {synthetic} is not backed! supply: {supply}, backing: {backing}")]
    SupplyMismatch {
        synthetic: SyntheticId,
        supply: Amount,
        backing: Amount,
    },
}

impl BridgeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            BridgeError::NotOwner { .. }
            | BridgeError::Unauthorized { .. }
            | BridgeError::UntrustedPeer { .. }
            | BridgeError::NoPeer { .. }
            | BridgeError::TokenNotLinked { .. }
            | BridgeError::TokenPaused { .. }
            | BridgeError::GatewayPaused
            | BridgeError::ChannelPaused { .. }
            | BridgeError::UnknownDestination { .. }
            | BridgeError::NoLinkForChain { .. }
            | BridgeError::UnknownSynthetic { .. }
            | BridgeError::AlreadyExists { .. }
            | BridgeError::AlreadyLinked { .. }
            | BridgeError::SyntheticAlreadyLinkedOnChain { .. }
            | BridgeError::DecimalsMismatch { .. }
            | BridgeError::DecimalsOutOfRange { .. }
            | BridgeError::UnknownAsset { .. }
            | BridgeError::WrongDestination { .. }
            | BridgeError::WrongReceiver { .. }
            | BridgeError::AssetChainMismatch { .. }
            | BridgeError::UnexpectedPayload { .. }
            | BridgeError::NoAssets
            | BridgeError::InvalidVerifierSet { .. }
            | BridgeError::InvalidEncoding { .. } => ErrorClass::Configuration,
            BridgeError::InsufficientFee { .. }
            | BridgeError::AmountTooSmall { .. }
            | BridgeError::InsufficientBalance { .. }
            | BridgeError::InsufficientBacking { .. }
            | BridgeError::InsufficientCustody { .. } => ErrorClass::Economic,
            BridgeError::NotVerified { .. }
            | BridgeError::OutOfOrder { .. }
            | BridgeError::QuorumNotReached { .. }
            | BridgeError::PayloadHashMismatch { .. }
            | BridgeError::InvalidSignature { .. }
            | BridgeError::MissingAttestation { .. } => ErrorClass::Liveness,
            BridgeError::InsufficientLockedBalance { .. }
            | BridgeError::Overflow
            | BridgeError::PrecisionLoss { .. }
            | BridgeError::SupplyMismatch { .. } => ErrorClass::Invariant,
        }
    }

    pub fn invalid_encoding<T>(reason: T) -> Self
    where
        T: ToString,
    {
        Self::InvalidEncoding {
            reason: reason.to_string(),
        }
    }
}

pub type BridgeResult<T> = core::result::Result<T, BridgeError>;

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    #[test_case(
        BridgeError::TokenPaused { asset: RemoteAsset::new(1, Addr32::mock(1)) },
        ErrorClass::Configuration;
        "paused token is a configuration error"
    )]
    #[test_case(
        BridgeError::AmountTooSmall { amount: 1, min: 2 },
        ErrorClass::Economic;
        "dust is an economic error"
    )]
    #[test_case(
        BridgeError::QuorumNotReached { have: 1, need: 2 },
        ErrorClass::Liveness;
        "missing quorum is a liveness error"
    )]
    #[test_case(
        BridgeError::InsufficientLockedBalance { asset: Addr32::mock(1), locked: 1, amount: 2 },
        ErrorClass::Invariant;
        "locked balance underflow is an invariant violation"
    )]
    fn classifying_errors(error: BridgeError, class: ErrorClass) {
        assert_eq!(error.class(), class);
    }

    #[test]
    fn error_messages_carry_values() {
        let error = BridgeError::InsufficientFee {
            required: 100,
            provided: 99,
        };

        assert_eq!(
            error.to_string(),
            "insufficient fee! required: 100, provided: 99"
        );
    }
}
