use {
    crate::{Addr32, ChainId, FeeSchedule, Lane, Nonce, VerifierSet},
    serde::{Deserialize, Serialize},
    std::collections::{BTreeMap, BTreeSet},
};

// ----------------------------------- types -----------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub owner: Addr32,
    pub local_chain: ChainId,
    /// Pricing per destination chain. Sending to a chain without a schedule
    /// is rejected.
    pub fee_schedules: BTreeMap<ChainId, FeeSchedule>,
    /// Destination chains to which sending is disabled.
    pub paused_paths: BTreeSet<ChainId>,
    /// Verifier set used for messages from a source chain, unless the
    /// receiver configured its own.
    pub default_receive: BTreeMap<ChainId, VerifierSet>,
    /// Receiver-specific verifier sets, keyed by receiver then source chain.
    pub receive_overrides: BTreeMap<Addr32, BTreeMap<ChainId, VerifierSet>>,
}

impl Config {
    /// The verifier set that applies to messages for `receiver` from
    /// `src_chain`.
    pub fn receive_config(&self, receiver: &Addr32, src_chain: ChainId) -> Option<&VerifierSet> {
        self.receive_overrides
            .get(receiver)
            .and_then(|sets| sets.get(&src_chain))
            .or_else(|| self.default_receive.get(&src_chain))
    }
}

// --------------------------------- messages ----------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InstantiateMsg {
    pub owner: Addr32,
    pub local_chain: ChainId,
    pub fee_schedules: BTreeMap<ChainId, FeeSchedule>,
    pub default_receive: BTreeMap<ChainId, VerifierSet>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// Owner only.
    SetFeeSchedule {
        dst_chain: ChainId,
        schedule: FeeSchedule,
    },
    /// Owner only.
    SetPathPaused { dst_chain: ChainId, paused: bool },
    /// Owner only.
    SetDefaultReceiveConfig {
        src_chain: ChainId,
        verifiers: VerifierSet,
    },
    /// The receiver, its delegate, or the owner. `None` reverts to the default.
    SetReceiveConfig {
        receiver: Addr32,
        src_chain: ChainId,
        verifiers: Option<VerifierSet>,
    },
    /// Sent by a receiver to appoint an account that may configure and skip on
    /// its behalf.
    SetDelegate { delegate: Option<Addr32> },
    /// Mark the next nonce of a lane as executed without delivering it. The
    /// receiver or its delegate only.
    Skip { lane: Lane, nonce: Nonce },
}
