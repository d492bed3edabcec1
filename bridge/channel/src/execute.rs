use {
    crate::{state::Attesters, Endpoint, OutboundPacket},
    bridge_types::{
        endpoint::{Config, ExecuteMsg, InstantiateMsg},
        Addr32, Amount, Attestation, BridgeError, BridgeResult, ChainId, DeliveryOptions,
        ErrorClass, Event, Lane, Message, MessageChannel, MessageReceiver, Nonce, Response,
        SendReceipt, VerifierSet, Versioned,
    },
    std::collections::{BTreeMap, BTreeSet, VecDeque},
};

impl Endpoint {
    pub fn new(msg: InstantiateMsg) -> BridgeResult<Self> {
        for verifiers in msg.default_receive.values() {
            verifiers.validate()?;
        }

        Ok(Self {
            config: Versioned::new(Config {
                owner: msg.owner,
                local_chain: msg.local_chain,
                fee_schedules: msg.fee_schedules,
                paused_paths: BTreeSet::new(),
                default_receive: msg.default_receive,
                receive_overrides: BTreeMap::new(),
            }),
            block_height: 0,
            outbound_nonces: BTreeMap::new(),
            inbound: BTreeMap::new(),
            attestations: BTreeMap::new(),
            outbox: VecDeque::new(),
            fees_collected: 0,
            delegates: BTreeMap::new(),
        })
    }

    pub fn execute(&mut self, sender: Addr32, msg: ExecuteMsg) -> BridgeResult<Response> {
        match msg {
            ExecuteMsg::SetFeeSchedule {
                dst_chain,
                schedule,
            } => {
                self.ensure_owner(sender)?;

                self.config.update(|config| {
                    config.fee_schedules.insert(dst_chain, schedule.clone());
                });

                Ok(Response::new().add_event(Event::FeeScheduleSet {
                    dst_chain,
                    schedule,
                }))
            },
            ExecuteMsg::SetPathPaused { dst_chain, paused } => {
                self.ensure_owner(sender)?;

                self.config.update(|config| {
                    if paused {
                        config.paused_paths.insert(dst_chain);
                    } else {
                        config.paused_paths.remove(&dst_chain);
                    }
                });

                tracing::info!(dst_chain, paused, "Updated channel path pause");

                Ok(Response::new().add_event(Event::PathPaused { dst_chain, paused }))
            },
            ExecuteMsg::SetDefaultReceiveConfig {
                src_chain,
                verifiers,
            } => {
                self.ensure_owner(sender)?;
                verifiers.validate()?;

                self.config.update(|config| {
                    config.default_receive.insert(src_chain, verifiers.clone());
                });

                Ok(Response::new().add_event(Event::ReceiveConfigSet {
                    receiver: None,
                    src_chain,
                    verifiers,
                }))
            },
            ExecuteMsg::SetReceiveConfig {
                receiver,
                src_chain,
                verifiers,
            } => set_receive_config(self, sender, receiver, src_chain, verifiers),
            ExecuteMsg::SetDelegate { delegate } => {
                match delegate {
                    Some(delegate) => self.delegates.insert(sender, delegate),
                    None => self.delegates.remove(&sender),
                };

                Ok(Response::new().add_event(Event::DelegateSet {
                    receiver: sender,
                    delegate,
                }))
            },
            ExecuteMsg::Skip { lane, nonce } => skip(self, sender, lane, nonce),
        }
    }

    /// Record a verifier's attestation of a message. The signer is recorded
    /// whether or not it belongs to any configured verifier set, so that a
    /// mismatch between the sending side's verifiers and the receiver's
    /// configuration is visible in [`Endpoint::verification_status`].
    ///
    /// Attesting a nonce that is already executed or skipped is a no-op.
    pub fn submit_attestation(
        &mut self,
        message: &Message,
        attestation: &Attestation,
    ) -> BridgeResult<Response> {
        let local_chain = self.config.get().local_chain;

        if message.dst_chain != local_chain {
            return Err(BridgeError::WrongDestination {
                expect: local_chain,
                got: message.dst_chain,
            });
        }

        let message_id = message.id();
        let verifier = attestation.recover(message_id)?;

        let lane = message.lane();
        if self
            .inbound
            .get(&lane)
            .is_some_and(|inbound| message.nonce <= inbound.executed_nonce)
        {
            tracing::debug!(%lane, nonce = message.nonce, %verifier, "Ignored late attestation");

            return Ok(Response::new());
        }

        self.attestations
            .entry((lane, message.nonce))
            .or_default()
            .entry(message_id)
            .or_default()
            .insert(verifier, attestation.confirmations);

        tracing::debug!(
            %lane,
            nonce = message.nonce,
            %verifier,
            confirmations = attestation.confirmations,
            "Recorded attestation"
        );

        Ok(Response::new().add_event(Event::AttestationSubmitted {
            message_id,
            verifier,
            confirmations: attestation.confirmations,
        }))
    }

    /// Mark a message as verified if enough of the receiver's configured
    /// verifiers attested to it with enough confirmations.
    ///
    /// Committing a message that is already verified or executed is a no-op.
    pub fn commit_verification(&mut self, message: &Message) -> BridgeResult<Response> {
        let config = self.config.snapshot();

        if message.dst_chain != config.local_chain {
            return Err(BridgeError::WrongDestination {
                expect: config.local_chain,
                got: message.dst_chain,
            });
        }

        let lane = message.lane();
        let inbound = self.inbound.get(&lane);

        if inbound.is_some_and(|inbound| {
            message.nonce <= inbound.executed_nonce || inbound.verified.contains_key(&message.nonce)
        }) {
            return Ok(Response::new());
        }

        let required = config
            .receive_config(&message.receiver, message.src_chain)
            .ok_or_else(|| BridgeError::InvalidVerifierSet {
                reason: format!("no receive config for source chain {}", message.src_chain),
            })?;

        let have = count_valid_attestations(
            required,
            self.attesters(message).unwrap_or(&BTreeMap::new()),
        );
        let need = required.threshold as usize;

        if have < need {
            tracing::debug!(%lane, nonce = message.nonce, have, need, "Quorum not reached");

            return Err(BridgeError::QuorumNotReached { have, need });
        }

        let payload_hash = message.payload_hash();

        self.inbound
            .entry(lane)
            .or_default()
            .verified
            .insert(message.nonce, payload_hash);

        tracing::info!(%lane, nonce = message.nonce, "Verified packet");

        Ok(Response::new().add_event(Event::PacketVerified {
            lane,
            nonce: message.nonce,
            payload_hash,
        }))
    }

    /// Hand a verified message to its receiver.
    ///
    /// Nonces are executed strictly in order within a lane. Delivering an
    /// already executed nonce is a no-op. If the receiver fails, nothing
    /// changes and the message can be delivered again later.
    pub fn deliver(
        &mut self,
        message: &Message,
        receiver: &mut dyn MessageReceiver,
    ) -> BridgeResult<Response> {
        let local_chain = self.config.get().local_chain;

        if message.dst_chain != local_chain {
            return Err(BridgeError::WrongDestination {
                expect: local_chain,
                got: message.dst_chain,
            });
        }

        if receiver.address() != message.receiver {
            return Err(BridgeError::WrongReceiver {
                expect: message.receiver,
                got: receiver.address(),
            });
        }

        let lane = message.lane();
        let inbound = self.inbound.get(&lane).cloned().unwrap_or_default();

        if message.nonce <= inbound.executed_nonce {
            tracing::debug!(%lane, nonce = message.nonce, "Packet already executed, skipping");

            return Ok(Response::new());
        }

        let expect = inbound.executed_nonce + 1;
        if message.nonce != expect {
            return Err(BridgeError::OutOfOrder {
                expect,
                got: message.nonce,
            });
        }

        match inbound.verified.get(&message.nonce) {
            None => {
                return Err(BridgeError::NotVerified {
                    nonce: message.nonce,
                });
            },
            Some(hash) if *hash != message.payload_hash() => {
                return Err(BridgeError::PayloadHashMismatch {
                    nonce: message.nonce,
                });
            },
            Some(_) => (),
        }

        let response = receiver
            .on_message(&lane, message.nonce, &message.payload)
            .inspect_err(|err| match err.class() {
                ErrorClass::Invariant => {
                    tracing::error!(%lane, nonce = message.nonce, %err, "Receiver broke an invariant");
                },
                class => {
                    tracing::warn!(%lane, nonce = message.nonce, %err, %class, "Receiver rejected packet");
                },
            })?;

        let message_id = message.id();

        let inbound = self.inbound.entry(lane).or_default();
        inbound.executed_nonce = message.nonce;
        inbound.verified.remove(&message.nonce);
        self.attestations.remove(&(lane, message.nonce));

        tracing::info!(%lane, nonce = message.nonce, "Delivered packet");

        Ok(response.add_event(Event::PacketDelivered {
            lane,
            nonce: message.nonce,
            message_id,
        }))
    }

    pub fn advance_blocks(&mut self, blocks: u64) {
        self.block_height = self.block_height.saturating_add(blocks);
    }

    /// Take every queued outbound packet, oldest first.
    pub fn drain_outbox(&mut self) -> Vec<OutboundPacket> {
        self.outbox.drain(..).collect()
    }

    pub(crate) fn attesters(&self, message: &Message) -> Option<&Attesters> {
        self.attestations
            .get(&(message.lane(), message.nonce))
            .and_then(|by_id| by_id.get(&message.id()))
    }

    pub(crate) fn ensure_owner(&self, sender: Addr32) -> BridgeResult<()> {
        let owner = self.config.get().owner;

        if sender != owner {
            return Err(BridgeError::NotOwner { sender, owner });
        }

        Ok(())
    }

    fn ensure_receiver_or_delegate(&self, sender: Addr32, receiver: Addr32) -> BridgeResult<()> {
        if sender == receiver || self.delegates.get(&receiver) == Some(&sender) {
            return Ok(());
        }

        Err(BridgeError::Unauthorized { sender })
    }
}

impl MessageChannel for Endpoint {
    fn local_chain(&self) -> ChainId {
        self.config.get().local_chain
    }

    fn quote(
        &self,
        dst_chain: ChainId,
        _receiver: Addr32,
        payload: &[u8],
        options: &DeliveryOptions,
    ) -> BridgeResult<Amount> {
        self.config
            .get()
            .fee_schedules
            .get(&dst_chain)
            .ok_or(BridgeError::UnknownDestination { chain: dst_chain })?
            .quote(payload.len(), options)
    }

    fn send(
        &mut self,
        sender: Addr32,
        dst_chain: ChainId,
        receiver: Addr32,
        payload: Vec<u8>,
        options: &DeliveryOptions,
        payment: Amount,
    ) -> BridgeResult<SendReceipt> {
        let config = self.config.snapshot();

        if config.paused_paths.contains(&dst_chain) {
            return Err(BridgeError::ChannelPaused {
                src: config.local_chain,
                dst: dst_chain,
            });
        }

        let fee = self.quote(dst_chain, receiver, &payload, options)?;

        let refund = payment
            .checked_sub(fee)
            .ok_or(BridgeError::InsufficientFee {
                required: fee,
                provided: payment,
            })?;

        let fees_collected = self
            .fees_collected
            .checked_add(fee)
            .ok_or(BridgeError::Overflow)?;

        let lane = Lane {
            src_chain: config.local_chain,
            sender,
            dst_chain,
            receiver,
        };

        let nonce = self
            .outbound_nonces
            .get(&lane)
            .copied()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(BridgeError::Overflow)?;

        let message = Message {
            src_chain: config.local_chain,
            sender,
            dst_chain,
            receiver,
            nonce,
            payload,
        };
        let message_id = message.id();

        self.outbound_nonces.insert(lane, nonce);
        self.fees_collected = fees_collected;
        self.outbox.push_back(OutboundPacket {
            message,
            block_height: self.block_height,
        });

        tracing::info!(%lane, nonce, %message_id, fee, "Sent packet");

        Ok(SendReceipt {
            nonce,
            message_id,
            dst_chain,
            fee,
            refund,
        })
    }
}

/// Number of configured verifiers that attested with at least the required
/// confirmations.
pub(crate) fn count_valid_attestations(required: &VerifierSet, attested: &Attesters) -> usize {
    required
        .verifiers
        .iter()
        .filter(|verifier| {
            attested
                .get(*verifier)
                .is_some_and(|confirmations| *confirmations >= required.confirmations)
        })
        .count()
}

fn set_receive_config(
    endpoint: &mut Endpoint,
    sender: Addr32,
    receiver: Addr32,
    src_chain: ChainId,
    verifiers: Option<VerifierSet>,
) -> BridgeResult<Response> {
    if sender != endpoint.config.get().owner {
        endpoint.ensure_receiver_or_delegate(sender, receiver)?;
    }

    if let Some(verifiers) = &verifiers {
        verifiers.validate()?;
    }

    let config = endpoint.config.update(|config| {
        let overrides = config.receive_overrides.entry(receiver).or_default();
        match &verifiers {
            Some(verifiers) => {
                overrides.insert(src_chain, verifiers.clone());
            },
            None => {
                overrides.remove(&src_chain);
            },
        }
    });

    // The effective set after the change, which may be the default.
    let effective = config.receive_config(&receiver, src_chain).cloned();

    tracing::info!(%receiver, src_chain, "Updated receive config");

    Ok(match effective {
        Some(verifiers) => Response::new().add_event(Event::ReceiveConfigSet {
            receiver: Some(receiver),
            src_chain,
            verifiers,
        }),
        None => Response::new(),
    })
}

fn skip(endpoint: &mut Endpoint, sender: Addr32, lane: Lane, nonce: Nonce) -> BridgeResult<Response> {
    endpoint.ensure_receiver_or_delegate(sender, lane.receiver)?;

    let inbound = endpoint.inbound.entry(lane).or_default();

    let expect = inbound.executed_nonce + 1;
    if nonce != expect {
        return Err(BridgeError::OutOfOrder { expect, got: nonce });
    }

    inbound.executed_nonce = nonce;
    inbound.verified.remove(&nonce);
    inbound.skipped.push(nonce);
    endpoint.attestations.remove(&(lane, nonce));

    tracing::warn!(%lane, nonce, caller = %sender, "Skipped packet");

    Ok(Response::new().add_event(Event::PacketSkipped {
        lane,
        nonce,
        caller: sender,
    }))
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        bridge_types::{verifier_address, FeeSchedule, PacketState},
        k256::ecdsa::SigningKey,
        test_case::test_case,
    };

    const LOCAL: ChainId = 30110;
    const REMOTE: ChainId = 30101;

    const OWNER: Addr32 = Addr32::mock(0);
    const SENDER: Addr32 = Addr32::mock(1);
    const RECEIVER: Addr32 = Addr32::mock(2);

    fn signer(seed: u8) -> SigningKey {
        SigningKey::from_slice(&[seed; 32]).unwrap()
    }

    fn verifier_set(seeds: &[u8], threshold: u32) -> VerifierSet {
        VerifierSet {
            threshold,
            verifiers: seeds
                .iter()
                .map(|seed| verifier_address(signer(*seed).verifying_key()))
                .collect(),
            confirmations: 2,
        }
    }

    fn setup() -> Endpoint {
        Endpoint::new(InstantiateMsg {
            owner: OWNER,
            local_chain: LOCAL,
            fee_schedules: BTreeMap::from([(REMOTE, FeeSchedule {
                base_fee: 10,
                per_byte_fee: 1,
                gas_price: 0,
            })]),
            default_receive: BTreeMap::from([(REMOTE, verifier_set(&[1, 2, 3], 2))]),
        })
        .unwrap()
    }

    fn inbound(nonce: Nonce, payload: &[u8]) -> Message {
        Message {
            src_chain: REMOTE,
            sender: SENDER,
            dst_chain: LOCAL,
            receiver: RECEIVER,
            nonce,
            payload: payload.to_vec(),
        }
    }

    fn attest(endpoint: &mut Endpoint, message: &Message, seeds: &[u8], confirmations: u64) {
        for seed in seeds {
            let attestation = Attestation::sign(&signer(*seed), message.id(), confirmations).unwrap();
            endpoint.submit_attestation(message, &attestation).unwrap();
        }
    }

    #[derive(Default)]
    struct Recorder {
        seen: Vec<(Nonce, Vec<u8>)>,
        fail: bool,
    }

    impl MessageReceiver for Recorder {
        fn address(&self) -> Addr32 {
            RECEIVER
        }

        fn on_message(&mut self, _lane: &Lane, nonce: Nonce, payload: &[u8]) -> BridgeResult<Response> {
            if self.fail {
                return Err(BridgeError::Overflow);
            }

            self.seen.push((nonce, payload.to_vec()));

            Ok(Response::new())
        }
    }

    #[test]
    fn sending_assigns_nonces_per_lane() {
        let mut endpoint = setup();

        let first = endpoint
            .send(SENDER, REMOTE, RECEIVER, vec![0; 5], &DeliveryOptions::default(), 100)
            .unwrap();
        let second = endpoint
            .send(SENDER, REMOTE, RECEIVER, vec![0; 5], &DeliveryOptions::default(), 15)
            .unwrap();
        let other_lane = endpoint
            .send(SENDER, REMOTE, Addr32::mock(9), vec![], &DeliveryOptions::default(), 10)
            .unwrap();

        assert_eq!((first.nonce, second.nonce, other_lane.nonce), (1, 2, 1));
        assert_eq!((first.fee, first.refund), (15, 85));
        assert_eq!(second.refund, 0);
        assert_eq!(endpoint.outbound_nonce(SENDER, REMOTE, RECEIVER), 2);
        assert_eq!(endpoint.fees_collected(), 15 + 15 + 10);
        assert_eq!(endpoint.drain_outbox().len(), 3);
    }

    #[test_case(14 => Err(BridgeError::InsufficientFee { required: 15, provided: 14 }) ; "underpaid")]
    #[test_case(15 => Ok(0) ; "exact")]
    #[test_case(20 => Ok(5) ; "overpaid")]
    fn paying_fees(payment: Amount) -> BridgeResult<Amount> {
        setup()
            .send(SENDER, REMOTE, RECEIVER, vec![0; 5], &DeliveryOptions::default(), payment)
            .map(|receipt| receipt.refund)
    }

    #[test]
    fn paused_path_rejects_sends() {
        let mut endpoint = setup();

        endpoint
            .execute(OWNER, ExecuteMsg::SetPathPaused {
                dst_chain: REMOTE,
                paused: true,
            })
            .unwrap();

        assert_eq!(
            endpoint.send(SENDER, REMOTE, RECEIVER, vec![], &DeliveryOptions::default(), 100),
            Err(BridgeError::ChannelPaused {
                src: LOCAL,
                dst: REMOTE
            })
        );
        assert_eq!(endpoint.outbound_nonce(SENDER, REMOTE, RECEIVER), 0);
    }

    #[test]
    fn only_owner_configures() {
        let mut endpoint = setup();

        assert_eq!(
            endpoint.execute(SENDER, ExecuteMsg::SetPathPaused {
                dst_chain: REMOTE,
                paused: true,
            }),
            Err(BridgeError::NotOwner {
                sender: SENDER,
                owner: OWNER
            })
        );
    }

    #[test]
    fn verifying_and_executing_in_order() {
        let mut endpoint = setup();
        let mut receiver = Recorder::default();

        let first = inbound(1, b"one");
        let second = inbound(2, b"two");

        // Verify the second message first.
        attest(&mut endpoint, &second, &[1, 2], 5);
        endpoint.commit_verification(&second).unwrap();

        let status = endpoint.lane_status(&second.lane());
        assert_eq!((status.last_verified_nonce, status.last_executed_nonce), (0, 0));

        // Nonce 2 can't run before nonce 1.
        assert_eq!(
            endpoint.deliver(&second, &mut receiver),
            Err(BridgeError::OutOfOrder { expect: 1, got: 2 })
        );
        assert_eq!(
            endpoint.deliver(&first, &mut receiver),
            Err(BridgeError::NotVerified { nonce: 1 })
        );

        attest(&mut endpoint, &first, &[2, 3], 5);
        endpoint.commit_verification(&first).unwrap();

        let status = endpoint.lane_status(&first.lane());
        assert_eq!((status.last_verified_nonce, status.pending), (2, 2));

        endpoint.deliver(&first, &mut receiver).unwrap();
        endpoint.deliver(&second, &mut receiver).unwrap();

        // Replays are no-ops.
        endpoint.deliver(&first, &mut receiver).unwrap();
        endpoint.deliver(&second, &mut receiver).unwrap();

        assert_eq!(receiver.seen, vec![(1, b"one".to_vec()), (2, b"two".to_vec())]);
        assert_eq!(endpoint.packet_state(&second), PacketState::Executed);
        assert_eq!(endpoint.lane_status(&first.lane()).last_executed_nonce, 2);
    }

    #[test]
    fn quorum_counts_only_configured_verifiers_with_confirmations() {
        let mut endpoint = setup();
        let message = inbound(1, b"one");

        // One valid, one outside the set, one without enough confirmations.
        attest(&mut endpoint, &message, &[1, 9], 5);
        attest(&mut endpoint, &message, &[2], 1);

        assert_eq!(
            endpoint.commit_verification(&message),
            Err(BridgeError::QuorumNotReached { have: 1, need: 2 })
        );

        let status = endpoint.verification_status(&message).unwrap();
        assert!(!status.quorum_reached);
        assert_eq!(status.attested.len(), 3);
        assert_eq!(status.missing.len(), 2);
        assert_eq!(status.unknown, BTreeSet::from([verifier_address(signer(9).verifying_key())]));
        assert_eq!(status.state, PacketState::Unverified);
    }

    #[test]
    fn failed_delivery_is_retriable() {
        let mut endpoint = setup();
        let mut receiver = Recorder {
            fail: true,
            ..Default::default()
        };

        let message = inbound(1, b"one");
        attest(&mut endpoint, &message, &[1, 2], 5);
        endpoint.commit_verification(&message).unwrap();

        assert!(endpoint.deliver(&message, &mut receiver).is_err());
        assert_eq!(endpoint.packet_state(&message), PacketState::Verified);

        receiver.fail = false;
        endpoint.deliver(&message, &mut receiver).unwrap();
        assert_eq!(endpoint.packet_state(&message), PacketState::Executed);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let mut endpoint = setup();
        let mut receiver = Recorder::default();

        let message = inbound(1, b"one");
        attest(&mut endpoint, &message, &[1, 2], 5);
        endpoint.commit_verification(&message).unwrap();

        assert_eq!(
            endpoint.deliver(&inbound(1, b"two"), &mut receiver),
            Err(BridgeError::PayloadHashMismatch { nonce: 1 })
        );
    }

    #[test]
    fn skipping_requires_receiver_and_next_nonce() {
        let mut endpoint = setup();
        let lane = inbound(1, b"").lane();

        assert_eq!(
            endpoint.execute(SENDER, ExecuteMsg::Skip { lane, nonce: 1 }),
            Err(BridgeError::Unauthorized { sender: SENDER })
        );
        assert_eq!(
            endpoint.execute(RECEIVER, ExecuteMsg::Skip { lane, nonce: 2 }),
            Err(BridgeError::OutOfOrder { expect: 1, got: 2 })
        );

        let delegate = Addr32::mock(7);
        endpoint
            .execute(RECEIVER, ExecuteMsg::SetDelegate {
                delegate: Some(delegate),
            })
            .unwrap();
        endpoint.execute(delegate, ExecuteMsg::Skip { lane, nonce: 1 }).unwrap();

        let status = endpoint.lane_status(&lane);
        assert_eq!(status.last_executed_nonce, 1);
        assert_eq!(status.skipped, vec![1]);
        assert_eq!(endpoint.packet_state(&inbound(1, b"")), PacketState::Skipped);
    }

    #[test]
    fn attestations_are_dropped_once_settled() {
        let mut endpoint = setup();
        let mut receiver = Recorder::default();

        let first = inbound(1, b"one");
        attest(&mut endpoint, &first, &[1, 2], 5);
        endpoint.commit_verification(&first).unwrap();
        endpoint.deliver(&first, &mut receiver).unwrap();

        assert!(endpoint.attestations.is_empty());

        // A relayer retrying after delivery leaves nothing behind.
        attest(&mut endpoint, &first, &[3], 5);
        assert!(endpoint.attestations.is_empty());

        // Neither does a message addressed to another chain.
        let foreign = Message {
            dst_chain: 999,
            ..inbound(2, b"two")
        };
        let attestation = Attestation::sign(&signer(1), foreign.id(), 5).unwrap();
        assert_eq!(
            endpoint.submit_attestation(&foreign, &attestation),
            Err(BridgeError::WrongDestination {
                expect: LOCAL,
                got: 999
            })
        );
        assert!(endpoint.attestations.is_empty());

        // Skipping a nonce drops what was collected for it.
        let second = inbound(2, b"two");
        attest(&mut endpoint, &second, &[1], 5);
        assert_eq!(endpoint.attestations.len(), 1);

        endpoint
            .execute(RECEIVER, ExecuteMsg::Skip {
                lane: second.lane(),
                nonce: 2,
            })
            .unwrap();
        assert!(endpoint.attestations.is_empty());

        attest(&mut endpoint, &second, &[2], 5);
        assert!(endpoint.attestations.is_empty());
    }

    #[test]
    fn receiver_specific_config_overrides_default() {
        let mut endpoint = setup();
        let message = inbound(1, b"one");

        endpoint
            .execute(RECEIVER, ExecuteMsg::SetReceiveConfig {
                receiver: RECEIVER,
                src_chain: REMOTE,
                verifiers: Some(verifier_set(&[4], 1)),
            })
            .unwrap();

        // The default verifiers no longer count.
        attest(&mut endpoint, &message, &[1, 2, 3], 5);
        assert_eq!(
            endpoint.commit_verification(&message),
            Err(BridgeError::QuorumNotReached { have: 0, need: 1 })
        );

        attest(&mut endpoint, &message, &[4], 5);
        endpoint.commit_verification(&message).unwrap();
    }
}
