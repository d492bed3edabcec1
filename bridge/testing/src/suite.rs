use {
    crate::{
        constants::{gateway_address, HUB, OWNER},
        verifier_set, DeploymentConfig, MockBank, MockVerifier,
    },
    anyhow::{anyhow, ensure},
    bridge_channel::{Endpoint, OutboundPacket},
    bridge_gateway::Gateway,
    bridge_hub::Hub,
    bridge_types::{
        endpoint, gateway, hub, Addr32, Amount, Bank, BridgeError, BridgeResult, ChainId, Message,
        MutableCtx, RemoteAsset, Response,
    },
    std::collections::BTreeMap,
};

/// Attached to calls that send messages. Overpayment is refunded.
pub const FEE_BUDGET: Amount = 1_000_000_000;

pub struct HubChain {
    pub chain: ChainId,
    pub endpoint: Endpoint,
    pub hub: Hub,
}

pub struct SpokeChain {
    pub chain: ChainId,
    pub endpoint: Endpoint,
    pub gateway: Gateway<MockBank>,
}

/// Outcome of handing one packet to its receiver.
#[derive(Debug)]
pub struct Delivery {
    pub message: Message,
    pub result: BridgeResult<Response>,
}

/// A hub chain, its spoke chains, and a relayer moving packets between them.
///
/// Packets are relayed only when asked to, so tests control exactly what is
/// in flight at any moment.
pub struct TestSuite {
    pub config: DeploymentConfig,
    pub hub: HubChain,
    pub spokes: BTreeMap<ChainId, SpokeChain>,
    /// Verifiers that sign packets in [`TestSuite::verify_all`]. By default
    /// the same set every endpoint requires.
    pub signers: Vec<MockVerifier>,
    /// Packets picked up from outboxes and not yet executed.
    pub in_flight: Vec<OutboundPacket>,
}

impl TestSuite {
    /// Bring up every chain of the deployment and create the synthetic
    /// assets. No token is linked yet.
    pub fn new(config: DeploymentConfig) -> anyhow::Result<Self> {
        let signers = config
            .verifiers
            .seeds
            .iter()
            .map(|seed| MockVerifier::new(*seed))
            .collect::<Vec<_>>();
        let verifiers = verifier_set(
            &signers,
            config.verifiers.threshold,
            config.verifiers.confirmations,
        );
        let fee = config.fee.schedule();

        let hub = HubChain {
            chain: config.hub_chain,
            endpoint: Endpoint::new(endpoint::InstantiateMsg {
                owner: OWNER,
                local_chain: config.hub_chain,
                fee_schedules: config
                    .spokes
                    .iter()
                    .map(|spoke| (spoke.chain, fee.clone()))
                    .collect(),
                default_receive: config
                    .spokes
                    .iter()
                    .map(|spoke| (spoke.chain, verifiers.clone()))
                    .collect(),
            })?,
            hub: Hub::new(HUB, config.hub_chain, hub::InstantiateMsg {
                owner: OWNER,
                peers: config
                    .spokes
                    .iter()
                    .enumerate()
                    .map(|(index, spoke)| (spoke.chain, gateway_address(index as u8)))
                    .collect(),
            }),
        };

        let mut spokes = BTreeMap::new();
        for (index, spoke) in config.spokes.iter().enumerate() {
            let mut bank = MockBank::new();
            for token in &spoke.tokens {
                bank.create_token(token.token(), token.decimals);
            }

            let endpoint = Endpoint::new(endpoint::InstantiateMsg {
                owner: OWNER,
                local_chain: spoke.chain,
                fee_schedules: BTreeMap::from([(config.hub_chain, fee.clone())]),
                default_receive: BTreeMap::from([(config.hub_chain, verifiers.clone())]),
            })?;

            let gateway = Gateway::new(gateway_address(index as u8), spoke.chain, bank, gateway::InstantiateMsg {
                owner: OWNER,
                hub_chain: config.hub_chain,
                hub: Some(HUB),
            });

            spokes.insert(spoke.chain, SpokeChain {
                chain: spoke.chain,
                endpoint,
                gateway,
            });
        }

        let mut suite = Self {
            config,
            hub,
            spokes,
            signers,
            in_flight: Vec::new(),
        };

        for synthetic in suite.config.synthetics.clone() {
            suite.execute_hub(OWNER, 0, hub::ExecuteMsg::CreateSyntheticAsset {
                name: synthetic.name,
                decimals: synthetic.decimals,
            })?;
        }

        Ok(suite)
    }

    /// The fixture deployment with every token linked to its synthetic.
    pub fn setup() -> anyhow::Result<Self> {
        let mut suite = Self::new(DeploymentConfig::fixture()?)?;
        suite.link_all_tokens()?;

        Ok(suite)
    }

    /// Have every gateway announce its tokens and deliver the announcements.
    pub fn link_all_tokens(&mut self) -> anyhow::Result<()> {
        for spoke in self.config.spokes.clone() {
            let configs = spoke
                .tokens
                .iter()
                .map(|token| -> anyhow::Result<gateway::TokenConfig> {
                    let synthetic = self
                        .hub
                        .hub
                        .synthetic_by_name(&token.synthetic)
                        .ok_or_else(|| anyhow!("unknown synthetic: {}", token.synthetic))?;

                    Ok(gateway::TokenConfig {
                        token: token.token(),
                        synthetic: synthetic.id,
                        synthetic_decimals: synthetic.decimals,
                        min_bridge_amount: token.min_bridge_amount as Amount,
                        paused: false,
                    })
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            self.execute_gateway(spoke.chain, OWNER, FEE_BUDGET, gateway::ExecuteMsg::LinkTokenToHub {
                configs,
                options: Default::default(),
            })?;
        }

        for delivery in self.deliver_all() {
            delivery.result?;
        }

        Ok(())
    }

    // ---------------------------------- calls --------------------------------

    pub fn execute_hub(&mut self, sender: Addr32, funds: Amount, msg: hub::ExecuteMsg) -> BridgeResult<Response> {
        let HubChain { endpoint, hub, .. } = &mut self.hub;

        hub.execute(
            MutableCtx {
                sender,
                funds,
                channel: endpoint,
            },
            msg,
        )
    }

    pub fn execute_gateway(
        &mut self,
        chain: ChainId,
        sender: Addr32,
        funds: Amount,
        msg: gateway::ExecuteMsg,
    ) -> BridgeResult<Response> {
        let SpokeChain {
            endpoint, gateway, ..
        } = self
            .spokes
            .get_mut(&chain)
            .ok_or(BridgeError::UnknownDestination { chain })?;

        gateway.execute(
            MutableCtx {
                sender,
                funds,
                channel: endpoint,
            },
            msg,
        )
    }

    // --------------------------------- getters -------------------------------

    pub fn spoke(&self, chain: ChainId) -> &SpokeChain {
        self.spokes
            .get(&chain)
            .unwrap_or_else(|| panic!("unknown spoke chain: {chain}"))
    }

    pub fn spoke_mut(&mut self, chain: ChainId) -> &mut SpokeChain {
        self.spokes
            .get_mut(&chain)
            .unwrap_or_else(|| panic!("unknown spoke chain: {chain}"))
    }

    pub fn gateway(&self, chain: ChainId) -> &Gateway<MockBank> {
        &self.spoke(chain).gateway
    }

    pub fn endpoint(&self, chain: ChainId) -> &Endpoint {
        if chain == self.hub.chain {
            &self.hub.endpoint
        } else {
            &self.spoke(chain).endpoint
        }
    }

    pub fn endpoint_mut(&mut self, chain: ChainId) -> &mut Endpoint {
        if chain == self.hub.chain {
            &mut self.hub.endpoint
        } else {
            &mut self.spoke_mut(chain).endpoint
        }
    }

    /// Address of a token of the fixture, by symbol.
    pub fn token(&self, chain: ChainId, symbol: &str) -> Addr32 {
        self.config
            .token(chain, symbol)
            .unwrap_or_else(|| panic!("unknown token {symbol} on chain {chain}"))
            .token()
    }

    pub fn remote_asset(&self, chain: ChainId, symbol: &str) -> RemoteAsset {
        RemoteAsset::new(chain, self.token(chain, symbol))
    }

    /// Credit `amount` of a spoke token to `to`.
    pub fn mint_token(&mut self, chain: ChainId, symbol: &str, to: Addr32, amount: Amount) {
        let token = self.token(chain, symbol);

        self.spoke_mut(chain)
            .gateway
            .bank_mut()
            .mint(token, to, amount);
    }

    pub fn token_balance(&self, chain: ChainId, symbol: &str, owner: Addr32) -> Amount {
        self.gateway(chain)
            .bank()
            .balance_of(self.token(chain, symbol), owner)
    }

    // --------------------------------- relayer -------------------------------

    pub fn advance_blocks(&mut self, blocks: u64) {
        self.hub.endpoint.advance_blocks(blocks);

        for spoke in self.spokes.values_mut() {
            spoke.endpoint.advance_blocks(blocks);
        }
    }

    /// Pick up every packet waiting in an outbox. Returns how many were picked up.
    pub fn relay(&mut self) -> usize {
        let before = self.in_flight.len();

        self.in_flight.extend(self.hub.endpoint.drain_outbox());

        for spoke in self.spokes.values_mut() {
            self.in_flight.extend(spoke.endpoint.drain_outbox());
        }

        self.in_flight.len() - before
    }

    /// Have every signer attest every packet in flight, claiming the
    /// confirmations its source chain has produced so far, then try to verify.
    pub fn verify_all(&mut self) {
        for packet in self.in_flight.clone() {
            let message = &packet.message;
            let confirmations = self
                .endpoint(message.src_chain)
                .block_height()
                .saturating_sub(packet.block_height);

            let attestations = self
                .signers
                .iter()
                .map(|signer| signer.attest(message, confirmations))
                .collect::<Vec<_>>();

            let endpoint = self.endpoint_mut(message.dst_chain);

            for attestation in &attestations {
                endpoint
                    .submit_attestation(message, attestation)
                    .expect("attestation must recover");
            }

            // Without quorum the packet simply stays unverified.
            if let Err(err) = endpoint.commit_verification(message) {
                tracing::debug!(nonce = message.nonce, %err, "Packet not verified");
            }
        }
    }

    /// Hand one message to its receiver through the destination endpoint.
    pub fn deliver(&mut self, message: &Message) -> BridgeResult<Response> {
        if message.dst_chain == self.hub.chain {
            let HubChain { endpoint, hub, .. } = &mut self.hub;

            return endpoint.deliver(message, hub);
        }

        let SpokeChain {
            endpoint, gateway, ..
        } = self
            .spokes
            .get_mut(&message.dst_chain)
            .ok_or(BridgeError::UnknownDestination {
                chain: message.dst_chain,
            })?;

        endpoint.deliver(message, gateway)
    }

    /// Try to execute every packet in flight, in the order they were sent.
    /// Failed packets stay in flight for a later retry.
    pub fn execute_all(&mut self) -> Vec<Delivery> {
        let mut deliveries = Vec::new();

        for packet in std::mem::take(&mut self.in_flight) {
            let result = self.deliver(&packet.message);

            if result.is_err() {
                self.in_flight.push(packet.clone());
            }

            deliveries.push(Delivery {
                message: packet.message,
                result,
            });
        }

        deliveries
    }

    /// Wait out the required confirmations, then relay, verify and execute
    /// everything that was sent.
    pub fn deliver_all(&mut self) -> Vec<Delivery> {
        self.advance_blocks(self.config.verifiers.confirmations);
        self.relay();
        self.verify_all();
        self.execute_all()
    }

    // -------------------------------- invariants -----------------------------

    /// With nothing in flight, every gateway's locked balance must equal the
    /// hub's backing for that asset, and the hub's own ledgers must agree.
    pub fn check_conservation(&self) -> anyhow::Result<()> {
        ensure!(self.in_flight.is_empty(), "packets are in flight");

        self.hub.hub.check_conservation()?;

        for spoke in self.spokes.values() {
            for (token, locked) in spoke.gateway.locked_balances() {
                let remote = RemoteAsset::new(spoke.chain, *token);
                let backing = self.hub.hub.backing(&remote);

                ensure!(
                    *locked == backing,
                    "locked balance does not match backing for {remote}! locked: {locked}, backing: {backing}"
                );
            }
        }

        for link in self.hub.hub.links(None, Some(u32::MAX)) {
            let Some(spoke) = self.spokes.get(&link.remote.chain) else {
                continue;
            };

            let locked = spoke.gateway.locked_balance(&link.remote.address);
            let backing = self.hub.hub.backing(&link.remote);

            ensure!(
                locked == backing,
                "backing is not locked for {}! locked: {locked}, backing: {backing}",
                link.remote
            );
        }

        Ok(())
    }
}
