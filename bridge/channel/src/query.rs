use {
    crate::{execute::count_valid_attestations, Endpoint, OutboundPacket},
    bridge_types::{
        endpoint::Config, Addr32, Amount, BridgeError, BridgeResult, ChainId, Hash256, Lane,
        LaneStatus, Message, Nonce, PacketState, VerificationStatus, VerifierSet,
    },
};

impl Endpoint {
    pub fn config(&self) -> &Config {
        self.config.get()
    }

    pub fn config_version(&self) -> u64 {
        self.config.version()
    }

    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    pub fn fees_collected(&self) -> Amount {
        self.fees_collected
    }

    /// Last nonce assigned on an outbound lane of this chain.
    pub fn outbound_nonce(&self, sender: Addr32, dst_chain: ChainId, receiver: Addr32) -> Nonce {
        let lane = Lane {
            src_chain: self.config.get().local_chain,
            sender,
            dst_chain,
            receiver,
        };

        self.outbound_nonces.get(&lane).copied().unwrap_or(0)
    }

    /// Packets sent but not yet drained by a relayer.
    pub fn outbox(&self) -> impl Iterator<Item = &OutboundPacket> {
        self.outbox.iter()
    }

    pub fn delegate(&self, receiver: &Addr32) -> Option<Addr32> {
        self.delegates.get(receiver).copied()
    }

    /// The verifier set applied to messages for `receiver` from `src_chain`.
    pub fn receive_config(&self, receiver: &Addr32, src_chain: ChainId) -> Option<&VerifierSet> {
        self.config.get().receive_config(receiver, src_chain)
    }

    pub fn lane_status(&self, lane: &Lane) -> LaneStatus {
        let Some(inbound) = self.inbound.get(lane) else {
            return LaneStatus::default();
        };

        let mut last_verified_nonce = inbound.executed_nonce;
        while inbound.verified.contains_key(&(last_verified_nonce + 1)) {
            last_verified_nonce += 1;
        }

        LaneStatus {
            last_verified_nonce,
            last_executed_nonce: inbound.executed_nonce,
            pending: last_verified_nonce - inbound.executed_nonce,
            skipped: inbound.skipped.clone(),
        }
    }

    /// Payload hash of a verified, not yet executed nonce.
    pub fn inbound_payload_hash(&self, lane: &Lane, nonce: Nonce) -> Option<Hash256> {
        self.inbound
            .get(lane)
            .and_then(|inbound| inbound.verified.get(&nonce))
            .copied()
    }

    pub fn packet_state(&self, message: &Message) -> PacketState {
        let Some(inbound) = self.inbound.get(&message.lane()) else {
            return PacketState::Unverified;
        };

        if inbound.skipped.contains(&message.nonce) {
            PacketState::Skipped
        } else if message.nonce <= inbound.executed_nonce {
            PacketState::Executed
        } else if inbound.verified.get(&message.nonce) == Some(&message.payload_hash()) {
            PacketState::Verified
        } else {
            PacketState::Unverified
        }
    }

    /// Compare the attestations received for a message against the verifier
    /// set the receiver requires. This is how a verifier-set mismatch between
    /// the two sides of a lane is diagnosed.
    pub fn verification_status(&self, message: &Message) -> BridgeResult<VerificationStatus> {
        let required = self
            .receive_config(&message.receiver, message.src_chain)
            .cloned()
            .ok_or_else(|| BridgeError::InvalidVerifierSet {
                reason: format!("no receive config for source chain {}", message.src_chain),
            })?;

        let message_id = message.id();
        let attested = self.attesters(message).cloned().unwrap_or_default();

        let missing = required
            .verifiers
            .iter()
            .filter(|verifier| {
                attested
                    .get(*verifier)
                    .map_or(true, |confirmations| *confirmations < required.confirmations)
            })
            .copied()
            .collect();

        let unknown = attested
            .keys()
            .filter(|verifier| !required.verifiers.contains(*verifier))
            .copied()
            .collect();

        let quorum_reached =
            count_valid_attestations(&required, &attested) >= required.threshold as usize;

        Ok(VerificationStatus {
            message_id,
            state: self.packet_state(message),
            required,
            attested,
            missing,
            unknown,
            quorum_reached,
        })
    }
}
