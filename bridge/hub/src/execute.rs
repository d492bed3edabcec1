use {
    crate::Hub,
    bridge_registry::{
        convert_synthetic_to_remote, remote_to_synthetic, remove_dust_synthetic, TokenLinkRegistry,
    },
    bridge_types::{
        hub::{Config, ExecuteMsg, InstantiateMsg},
        Addr32, Amount, Asset, BridgeError, BridgeResult, ChainId, Coin, DeliveryOptions, Entry,
        Event, Lane, Ledger, LedgerError, LinkConfig, MessageReceiver, MutableCtx, Nonce, Payload,
        RemoteAsset, Response, SyntheticId, TokenLink, Versioned,
    },
    std::collections::BTreeMap,
};

/// A bridge-back that passed validation, ready to be sent.
pub(crate) struct PreparedBridgeBack {
    pub link: TokenLink,
    pub peer: Addr32,
    pub recipient: Addr32,
    /// Amount burned, dust removed.
    pub amount: Amount,
    pub remote_amount: Amount,
    pub payload: Vec<u8>,
}

impl Hub {
    pub fn new(address: Addr32, local_chain: ChainId, msg: InstantiateMsg) -> Self {
        Self {
            address,
            config: Versioned::new(Config {
                owner: msg.owner,
                local_chain,
                peers: msg.peers,
            }),
            registry: TokenLinkRegistry::new(),
            gateways: BTreeMap::new(),
            balances: Ledger::new(),
            supply: Ledger::new(),
            backing: Ledger::new(),
            processed: BTreeMap::new(),
        }
    }

    pub fn execute(&mut self, ctx: MutableCtx, msg: ExecuteMsg) -> BridgeResult<Response> {
        match msg {
            ExecuteMsg::CreateSyntheticAsset { name, decimals } => {
                self.create_synthetic_asset(ctx, name, decimals)
            },
            ExecuteMsg::LinkRemoteToken {
                synthetic,
                remote,
                gateway,
                decimals_delta,
                min_bridge_amount,
            } => self.link_remote_token(ctx, TokenLink {
                remote,
                synthetic,
                decimals_delta,
                min_bridge_amount,
                paused: false,
                gateway,
            }),
            ExecuteMsg::SetPeer { chain, peer } => self.set_peer(ctx, chain, peer),
            ExecuteMsg::SetPaused { remote, paused } => self.set_paused(ctx, remote, paused),
            ExecuteMsg::SetMinBridgeAmount { remote, amount } => {
                self.set_min_bridge_amount(ctx, remote, amount)
            },
            ExecuteMsg::BridgeBack {
                synthetic,
                amount,
                dst_chain,
                recipient,
                options,
            } => self.bridge_back(ctx, synthetic, amount, dst_chain, recipient, options),
            ExecuteMsg::AdminRescueFromGateway {
                chain,
                recipient,
                assets,
                options,
            } => self.admin_rescue_from_gateway(ctx, chain, recipient, assets, options),
            ExecuteMsg::Transfer {
                synthetic,
                to,
                amount,
            } => self.transfer(ctx, synthetic, to, amount),
        }
    }

    fn ensure_owner(&self, sender: Addr32) -> BridgeResult<()> {
        let owner = self.config.get().owner;

        if sender != owner {
            return Err(BridgeError::NotOwner { sender, owner });
        }

        Ok(())
    }

    pub(crate) fn peer(&self, chain: ChainId) -> BridgeResult<Addr32> {
        self.config
            .get()
            .peers
            .get(&chain)
            .copied()
            .ok_or(BridgeError::NoPeer { chain })
    }

    fn create_synthetic_asset(
        &mut self,
        ctx: MutableCtx,
        name: String,
        decimals: u8,
    ) -> BridgeResult<Response> {
        self.ensure_owner(ctx.sender)?;

        let info = self.registry.create_synthetic_asset(name, decimals)?;

        tracing::info!(synthetic = info.id, name = %info.name, decimals, "Created synthetic asset");

        Ok(Response::new().add_event(Event::SyntheticAssetCreated {
            synthetic: info.id,
            name: info.name,
            decimals: info.decimals,
        }))
    }

    fn link_remote_token(&mut self, ctx: MutableCtx, link: TokenLink) -> BridgeResult<Response> {
        self.ensure_owner(ctx.sender)?;

        let link = self.registry.link_remote_token(link)?.clone();

        tracing::info!(remote = %link.remote, synthetic = link.synthetic, "Linked remote token");

        Ok(Response::new().add_event(Event::TokenLinked { link }))
    }

    fn set_peer(&mut self, ctx: MutableCtx, chain: ChainId, peer: Addr32) -> BridgeResult<Response> {
        self.ensure_owner(ctx.sender)?;

        self.config.update(|config| {
            config.peers.insert(chain, peer);
        });

        tracing::info!(chain, %peer, "Set gateway peer");

        Ok(Response::new().add_event(Event::PeerSet { chain, peer }))
    }

    fn set_paused(&mut self, ctx: MutableCtx, remote: RemoteAsset, paused: bool) -> BridgeResult<Response> {
        self.ensure_owner(ctx.sender)?;

        self.registry.set_paused(&remote, paused)?;

        tracing::info!(%remote, paused, "Updated link pause");

        Ok(Response::new().add_event(Event::LinkPaused {
            asset: remote,
            paused,
        }))
    }

    fn set_min_bridge_amount(
        &mut self,
        ctx: MutableCtx,
        remote: RemoteAsset,
        amount: Amount,
    ) -> BridgeResult<Response> {
        self.ensure_owner(ctx.sender)?;

        self.registry.set_min_bridge_amount(&remote, amount)?;

        tracing::info!(%remote, amount, "Updated minimum bridge amount");

        Ok(Response::new().add_event(Event::MinBridgeAmountSet {
            asset: remote,
            amount,
        }))
    }

    /// Validate a bridge-back without touching any state.
    pub(crate) fn prepare_bridge_back(
        &self,
        sender: Addr32,
        synthetic: SyntheticId,
        amount: Amount,
        dst_chain: ChainId,
        recipient: Option<Addr32>,
    ) -> BridgeResult<PreparedBridgeBack> {
        if self.registry.synthetic(synthetic).is_none() {
            return Err(BridgeError::UnknownSynthetic { synthetic });
        }

        let link = self
            .registry
            .link_for(synthetic, dst_chain)
            .cloned()
            .ok_or(BridgeError::NoLinkForChain {
                synthetic,
                chain: dst_chain,
            })?;

        if link.paused {
            return Err(BridgeError::TokenPaused { asset: link.remote });
        }

        let peer = self.peer(dst_chain)?;
        let recipient = recipient.unwrap_or(sender);

        let amount = remove_dust_synthetic(link.decimals_delta, amount)?;
        let remote_amount = convert_synthetic_to_remote(&link, amount)?;

        let payload = Payload::Release {
            recipient,
            remote: link.remote.address,
            amount: remote_amount,
        }
        .encode();

        Ok(PreparedBridgeBack {
            link,
            peer,
            recipient,
            amount,
            remote_amount,
            payload,
        })
    }

    fn bridge_back(
        &mut self,
        mut ctx: MutableCtx,
        synthetic: SyntheticId,
        amount: Amount,
        dst_chain: ChainId,
        recipient: Option<Addr32>,
        options: DeliveryOptions,
    ) -> BridgeResult<Response> {
        let PreparedBridgeBack {
            link,
            peer,
            recipient,
            amount,
            remote_amount,
            payload,
        } = self.prepare_bridge_back(ctx.sender, synthetic, amount, dst_chain, recipient)?;

        let balances = self
            .balances
            .preview([Entry::Debit((synthetic, ctx.sender), amount)])
            .map_err(|err| match err {
                LedgerError::Insufficient { balance, amount } => {
                    BridgeError::InsufficientBalance { balance, amount }
                },
                LedgerError::Overflow => BridgeError::Overflow,
            })?;

        let supply = self
            .supply
            .preview([Entry::Debit(synthetic, amount)])
            .map_err(|err| {
                tracing::error!(synthetic, amount, %err, "Burn exceeds total supply");
                BridgeError::Overflow
            })?;

        // The destination gateway must hold enough collateral for this asset.
        let backing = self
            .backing
            .preview([Entry::Debit(link.remote, remote_amount)])
            .map_err(|err| match err {
                LedgerError::Insufficient { balance, amount } => BridgeError::InsufficientBacking {
                    asset: link.remote,
                    backing: balance,
                    amount,
                },
                LedgerError::Overflow => BridgeError::Overflow,
            })?;

        let receipt = ctx.channel.send(
            self.address,
            dst_chain,
            peer,
            payload,
            &options,
            ctx.funds,
        )?;

        self.balances.commit(balances);
        self.supply.commit(supply);
        self.backing.commit(backing);

        tracing::info!(
            synthetic,
            owner = %ctx.sender,
            amount,
            dst_chain,
            %recipient,
            remote_amount,
            nonce = receipt.nonce,
            "Bridged back"
        );

        Ok(Response::new()
            .add_event(Event::SyntheticBurned {
                synthetic,
                owner: ctx.sender,
                amount,
            })
            .add_event(Event::BridgedBack {
                synthetic,
                dst_chain,
                recipient,
                remote_amount,
                nonce: receipt.nonce,
            })
            .add_receipt(receipt))
    }

    /// Validate an admin rescue and build its payload.
    pub(crate) fn prepare_admin_rescue(
        &self,
        chain: ChainId,
        recipient: Addr32,
        assets: &[Coin],
    ) -> BridgeResult<(Addr32, Vec<u8>)> {
        let peer = self.peer(chain)?;

        if assets.is_empty() {
            return Err(BridgeError::NoAssets);
        }

        let payload = Payload::AdminRescue {
            recipient,
            assets: assets.to_vec(),
        }
        .encode();

        Ok((peer, payload))
    }

    /// Instruct a gateway to pay out custody with no matching burn. Backing is
    /// left untouched: the rescue corrects a divergence that already exists.
    fn admin_rescue_from_gateway(
        &mut self,
        mut ctx: MutableCtx,
        chain: ChainId,
        recipient: Addr32,
        assets: Vec<Coin>,
        options: DeliveryOptions,
    ) -> BridgeResult<Response> {
        self.ensure_owner(ctx.sender)?;

        let (peer, payload) = self.prepare_admin_rescue(chain, recipient, &assets)?;

        let receipt = ctx.channel.send(self.address, chain, peer, payload, &options, ctx.funds)?;

        tracing::warn!(
            chain,
            %recipient,
            assets = assets.len(),
            nonce = receipt.nonce,
            "Sent admin rescue to gateway"
        );

        Ok(Response::new()
            .add_event(Event::AdminRescueSent {
                dst_chain: chain,
                recipient,
                assets,
                nonce: receipt.nonce,
            })
            .add_receipt(receipt))
    }

    fn transfer(
        &mut self,
        ctx: MutableCtx,
        synthetic: SyntheticId,
        to: Addr32,
        amount: Amount,
    ) -> BridgeResult<Response> {
        if self.registry.synthetic(synthetic).is_none() {
            return Err(BridgeError::UnknownSynthetic { synthetic });
        }

        let pending = self
            .balances
            .preview([
                Entry::Debit((synthetic, ctx.sender), amount),
                Entry::Credit((synthetic, to), amount),
            ])
            .map_err(|err| match err {
                LedgerError::Insufficient { balance, amount } => {
                    BridgeError::InsufficientBalance { balance, amount }
                },
                LedgerError::Overflow => BridgeError::Overflow,
            })?;

        self.balances.commit(pending);

        Ok(Response::new().add_event(Event::SyntheticTransferred {
            synthetic,
            from: ctx.sender,
            to,
            amount,
        }))
    }

    /// Mint against assets locked on `src_chain`. An unlinked asset fails the
    /// whole message, which stays verified on the channel and can be retried
    /// once the link exists.
    fn mint(&mut self, src_chain: ChainId, recipient: Addr32, assets: Vec<Asset>) -> BridgeResult<Response> {
        let mut balances = Vec::with_capacity(assets.len());
        let mut supply = Vec::with_capacity(assets.len());
        let mut backing = Vec::with_capacity(assets.len());
        let mut events = Vec::with_capacity(assets.len());

        for asset in assets {
            if asset.remote.chain != src_chain {
                return Err(BridgeError::AssetChainMismatch {
                    expect: src_chain,
                    got: asset.remote.chain,
                });
            }

            let link = self
                .registry
                .link(&asset.remote)
                .ok_or(BridgeError::TokenNotLinked {
                    asset: asset.remote,
                })?;

            // Pause and minimum were enforced by the gateway when the deposit
            // was made; the assets are locked already.
            let amount = remote_to_synthetic(link.decimals_delta, asset.amount)?;

            balances.push(Entry::Credit((link.synthetic, recipient), amount));
            supply.push(Entry::Credit(link.synthetic, amount));
            backing.push(Entry::Credit(asset.remote, asset.amount));
            events.push(Event::SyntheticMinted {
                synthetic: link.synthetic,
                recipient,
                amount,
                backing: asset.remote,
            });
        }

        let balances = self.balances.preview(balances).map_err(|_| BridgeError::Overflow)?;
        let supply = self.supply.preview(supply).map_err(|_| BridgeError::Overflow)?;
        let backing = self.backing.preview(backing).map_err(|_| BridgeError::Overflow)?;

        self.balances.commit(balances);
        self.supply.commit(supply);
        self.backing.commit(backing);

        tracing::info!(src_chain, %recipient, assets = events.len(), "Minted synthetic");

        Ok(Response::new().add_events(events))
    }

    fn apply_links(&mut self, chain: ChainId, gateway: Addr32, configs: &[LinkConfig]) -> BridgeResult<Response> {
        let links = self.registry.apply_links(chain, gateway, configs)?;

        let mut response = Response::new();

        if self.gateways.insert(chain, gateway) != Some(gateway) {
            tracing::info!(chain, %gateway, "Registered gateway");

            response = response.add_event(Event::GatewayRegistered { chain, gateway });
        }

        tracing::info!(chain, count = links.len(), "Applied token links");

        Ok(response.add_events(links.into_iter().map(|link| Event::TokenLinked { link })))
    }
}

impl MessageReceiver for Hub {
    fn address(&self) -> Addr32 {
        self.address
    }

    fn on_message(&mut self, lane: &Lane, nonce: Nonce, payload: &[u8]) -> BridgeResult<Response> {
        let peer = self.peer(lane.src_chain)?;

        if lane.sender != peer {
            tracing::warn!(%lane, nonce, "Rejected message from untrusted sender");

            return Err(BridgeError::UntrustedPeer {
                chain: lane.src_chain,
                expect: peer,
                got: lane.sender,
            });
        }

        let origin = (lane.src_chain, lane.sender);
        if self.processed.get(&origin).is_some_and(|last| nonce <= *last) {
            tracing::debug!(%lane, nonce, "Message already processed");

            return Ok(Response::new());
        }

        let response = match Payload::decode(payload)? {
            Payload::Deposit { recipient, assets } => self.mint(lane.src_chain, recipient, assets)?,
            Payload::LinkTokens { configs } => self.apply_links(lane.src_chain, lane.sender, &configs)?,
            payload => {
                return Err(BridgeError::UnexpectedPayload {
                    kind: payload.kind(),
                });
            },
        };

        self.processed.insert(origin, nonce);

        Ok(response)
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    const HUB_CHAIN: ChainId = 1;
    const ETH: ChainId = 30101;
    const OWNER: Addr32 = Addr32::mock(1);
    const HUB: Addr32 = Addr32::mock(2);
    const GATEWAY: Addr32 = Addr32::mock(3);
    const USDC: Addr32 = Addr32::mock(4);
    const ALICE: Addr32 = Addr32::mock(5);

    fn lane(sender: Addr32) -> Lane {
        Lane {
            src_chain: ETH,
            sender,
            dst_chain: HUB_CHAIN,
            receiver: HUB,
        }
    }

    fn link_payload(synthetic_decimals: u8) -> Vec<u8> {
        Payload::LinkTokens {
            configs: vec![LinkConfig {
                remote: USDC,
                remote_decimals: 6,
                synthetic: 1,
                synthetic_decimals,
                min_bridge_amount: 1_000_000,
                paused: false,
            }],
        }
        .encode()
    }

    fn deposit_payload(amount: Amount) -> Vec<u8> {
        Payload::Deposit {
            recipient: ALICE,
            assets: vec![Asset {
                remote: RemoteAsset::new(ETH, USDC),
                amount,
            }],
        }
        .encode()
    }

    fn setup_hub() -> Hub {
        let mut hub = Hub::new(HUB, HUB_CHAIN, InstantiateMsg {
            owner: OWNER,
            peers: BTreeMap::from([(ETH, GATEWAY)]),
        });

        hub.registry
            .create_synthetic_asset("USDC".to_string(), 18)
            .unwrap();

        hub
    }

    #[test]
    fn untrusted_sender_is_rejected() {
        let mut hub = setup_hub();

        let err = hub
            .on_message(&lane(ALICE), 1, &deposit_payload(1_000_000))
            .unwrap_err();

        assert_eq!(err, BridgeError::UntrustedPeer {
            chain: ETH,
            expect: GATEWAY,
            got: ALICE,
        });
        assert_eq!(hub.supply.total(), 0);
    }

    #[test]
    fn unlinked_deposit_is_retriable() {
        let mut hub = setup_hub();

        // The deposit overtakes the link announcement.
        let err = hub
            .on_message(&lane(GATEWAY), 2, &deposit_payload(2_000_000))
            .unwrap_err();

        assert_eq!(err, BridgeError::TokenNotLinked {
            asset: RemoteAsset::new(ETH, USDC),
        });
        assert_eq!(hub.last_processed_nonce(ETH, GATEWAY), 0);

        hub.on_message(&lane(GATEWAY), 1, &link_payload(18)).unwrap();

        let response = hub
            .on_message(&lane(GATEWAY), 2, &deposit_payload(2_000_000))
            .unwrap();

        assert_eq!(response.events, vec![Event::SyntheticMinted {
            synthetic: 1,
            recipient: ALICE,
            amount: 2_000_000_000_000_000_000,
            backing: RemoteAsset::new(ETH, USDC),
        }]);
        assert_eq!(hub.balance(1, ALICE), 2_000_000_000_000_000_000);
        assert_eq!(hub.backing(&RemoteAsset::new(ETH, USDC)), 2_000_000);
        assert!(hub.check_conservation().is_ok());
    }

    #[test]
    fn redelivery_is_noop() {
        let mut hub = setup_hub();

        hub.on_message(&lane(GATEWAY), 1, &link_payload(18)).unwrap();
        hub.on_message(&lane(GATEWAY), 2, &deposit_payload(1_000_000))
            .unwrap();

        let response = hub
            .on_message(&lane(GATEWAY), 2, &deposit_payload(1_000_000))
            .unwrap();

        assert_eq!(response, Response::new());
        assert_eq!(hub.total_supply(1), 1_000_000_000_000_000_000);
    }

    #[test_case(18 ; "matching decimals")]
    #[test_case(8 => panics ; "mismatched decimals")]
    fn linking_from_gateway(synthetic_decimals: u8) {
        let mut hub = setup_hub();

        let response = hub
            .on_message(&lane(GATEWAY), 1, &link_payload(synthetic_decimals))
            .unwrap();

        assert_eq!(response.events[0], Event::GatewayRegistered {
            chain: ETH,
            gateway: GATEWAY,
        });
        assert_eq!(hub.gateway(ETH), Some(GATEWAY));
        assert_eq!(hub.link(&RemoteAsset::new(ETH, USDC)).unwrap().decimals_delta, 12);
    }

    #[test]
    fn release_payload_is_unexpected() {
        let mut hub = setup_hub();

        let payload = Payload::Release {
            recipient: ALICE,
            remote: USDC,
            amount: 1,
        }
        .encode();

        assert!(matches!(
            hub.on_message(&lane(GATEWAY), 1, &payload),
            Err(BridgeError::UnexpectedPayload { .. })
        ));
    }
}
