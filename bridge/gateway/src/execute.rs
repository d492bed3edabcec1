use {
    crate::Gateway,
    bridge_registry::{check_decimals_delta, convert_remote_to_synthetic, remove_dust_remote},
    bridge_types::{
        gateway::{Config, ExecuteMsg, GatewayToken, InstantiateMsg, TokenConfig},
        Addr32, Amount, Asset, Bank, BridgeError, BridgeResult, ChainId, Coin, DeliveryOptions,
        Entry, Event, Lane, Ledger, LedgerError, LinkConfig, MessageReceiver, MutableCtx, Nonce,
        Payload, RemoteAsset, Response, TokenLink, Versioned,
    },
    std::collections::BTreeMap,
};

/// A deposit that passed validation, ready to be sent.
pub(crate) struct PreparedDeposit {
    pub hub_chain: ChainId,
    pub hub: Addr32,
    /// One entry per token, dust removed.
    pub assets: Vec<Asset>,
    pub payload: Vec<u8>,
}

impl<B> Gateway<B>
where
    B: Bank,
{
    pub fn new(address: Addr32, local_chain: ChainId, bank: B, msg: InstantiateMsg) -> Self {
        Self {
            address,
            config: Versioned::new(Config {
                owner: msg.owner,
                local_chain,
                hub_chain: msg.hub_chain,
                hub: msg.hub,
                paused: false,
            }),
            tokens: BTreeMap::new(),
            locked: Ledger::new(),
            processed: BTreeMap::new(),
            bank,
        }
    }

    pub fn execute(&mut self, ctx: MutableCtx, msg: ExecuteMsg) -> BridgeResult<Response> {
        match msg {
            ExecuteMsg::SetPeer { chain, peer } => self.set_peer(ctx, chain, peer),
            ExecuteMsg::SetGatewayPaused { paused } => self.set_gateway_paused(ctx, paused),
            ExecuteMsg::SetPaused { token, paused } => self.set_paused(ctx, token, paused),
            ExecuteMsg::SetMinBridgeAmount { token, amount } => {
                self.set_min_bridge_amount(ctx, token, amount)
            },
            ExecuteMsg::LinkTokenToHub { configs, options } => {
                self.link_token_to_hub(ctx, configs, options)
            },
            ExecuteMsg::Deposit {
                recipient,
                assets,
                options,
            } => self.deposit(ctx, recipient, assets, options),
            ExecuteMsg::RescueTokens { token, to, amount } => {
                self.rescue_tokens(ctx, token, to, amount)
            },
        }
    }

    fn ensure_owner(&self, sender: Addr32) -> BridgeResult<()> {
        let owner = self.config.get().owner;

        if sender != owner {
            return Err(BridgeError::NotOwner { sender, owner });
        }

        Ok(())
    }

    pub(crate) fn remote_asset(&self, token: Addr32) -> RemoteAsset {
        RemoteAsset::new(self.config.get().local_chain, token)
    }

    pub(crate) fn hub(&self) -> BridgeResult<(ChainId, Addr32)> {
        let config = self.config.get();

        config
            .hub
            .map(|hub| (config.hub_chain, hub))
            .ok_or(BridgeError::NoPeer {
                chain: config.hub_chain,
            })
    }

    fn set_peer(&mut self, ctx: MutableCtx, chain: ChainId, peer: Addr32) -> BridgeResult<Response> {
        self.ensure_owner(ctx.sender)?;

        let hub_chain = self.config.get().hub_chain;
        if chain != hub_chain {
            return Err(BridgeError::WrongDestination {
                expect: hub_chain,
                got: chain,
            });
        }

        self.config.update(|config| config.hub = Some(peer));

        tracing::info!(chain, %peer, "Set hub peer");

        Ok(Response::new().add_event(Event::PeerSet { chain, peer }))
    }

    fn set_gateway_paused(&mut self, ctx: MutableCtx, paused: bool) -> BridgeResult<Response> {
        self.ensure_owner(ctx.sender)?;

        self.config.update(|config| config.paused = paused);

        tracing::info!(paused, "Updated gateway pause");

        Ok(Response::new().add_event(Event::GatewayPaused { paused }))
    }

    fn set_paused(&mut self, ctx: MutableCtx, token: Addr32, paused: bool) -> BridgeResult<Response> {
        self.ensure_owner(ctx.sender)?;

        let asset = self.remote_asset(token);
        let entry = self
            .tokens
            .get_mut(&token)
            .ok_or(BridgeError::TokenNotLinked { asset })?;

        entry.paused = paused;

        tracing::info!(%asset, paused, "Updated token pause");

        Ok(Response::new().add_event(Event::LinkPaused { asset, paused }))
    }

    fn set_min_bridge_amount(
        &mut self,
        ctx: MutableCtx,
        token: Addr32,
        amount: Amount,
    ) -> BridgeResult<Response> {
        self.ensure_owner(ctx.sender)?;

        let asset = self.remote_asset(token);
        let entry = self
            .tokens
            .get_mut(&token)
            .ok_or(BridgeError::TokenNotLinked { asset })?;

        entry.min_bridge_amount = amount;

        tracing::info!(%asset, amount, "Updated minimum bridge amount");

        Ok(Response::new().add_event(Event::MinBridgeAmountSet { asset, amount }))
    }

    /// Validate link announcements against the local bank. Returns the token
    /// records to store and the configs to send.
    pub(crate) fn prepare_links(
        &self,
        configs: &[TokenConfig],
    ) -> BridgeResult<(Vec<GatewayToken>, Vec<LinkConfig>)> {
        if configs.is_empty() {
            return Err(BridgeError::NoAssets);
        }

        let mut tokens = Vec::with_capacity(configs.len());
        let mut links = Vec::with_capacity(configs.len());

        for config in configs {
            let decimals = self.bank.decimals(config.token)?;
            let decimals_delta = check_decimals_delta(TokenLink::decimals_delta(
                config.synthetic_decimals,
                decimals,
            ))?;

            if let Some(existing) = self.tokens.get(&config.token) {
                if existing.synthetic != config.synthetic {
                    return Err(BridgeError::AlreadyLinked {
                        asset: self.remote_asset(config.token),
                    });
                }
            }

            tokens.push(GatewayToken {
                token: config.token,
                decimals,
                synthetic: config.synthetic,
                synthetic_decimals: config.synthetic_decimals,
                decimals_delta,
                min_bridge_amount: config.min_bridge_amount,
                paused: config.paused,
            });

            links.push(LinkConfig {
                remote: config.token,
                remote_decimals: decimals,
                synthetic: config.synthetic,
                synthetic_decimals: config.synthetic_decimals,
                min_bridge_amount: config.min_bridge_amount,
                paused: config.paused,
            });
        }

        Ok((tokens, links))
    }

    fn link_token_to_hub(
        &mut self,
        mut ctx: MutableCtx,
        configs: Vec<TokenConfig>,
        options: DeliveryOptions,
    ) -> BridgeResult<Response> {
        self.ensure_owner(ctx.sender)?;

        let (hub_chain, hub) = self.hub()?;
        let (tokens, links) = self.prepare_links(&configs)?;

        let payload = Payload::LinkTokens {
            configs: links.clone(),
        };

        let receipt = ctx.channel.send(
            self.address,
            hub_chain,
            hub,
            payload.encode(),
            &options,
            ctx.funds,
        )?;

        for token in tokens {
            self.tokens.insert(token.token, token);
        }

        tracing::info!(count = links.len(), nonce = receipt.nonce, "Sent token links to hub");

        Ok(Response::new()
            .add_event(Event::LinkTokensSent {
                configs: links,
                nonce: receipt.nonce,
            })
            .add_receipt(receipt))
    }

    /// Validate a deposit without touching any state: the gateway and every
    /// token must be active, and every amount, after dust removal, must meet
    /// the token's minimum.
    pub(crate) fn prepare_deposit(&self, recipient: Addr32, coins: &[Coin]) -> BridgeResult<PreparedDeposit> {
        let config = self.config.get();

        if config.paused {
            return Err(BridgeError::GatewayPaused);
        }

        let (hub_chain, hub) = self.hub()?;

        if coins.is_empty() {
            return Err(BridgeError::NoAssets);
        }

        let mut amounts = BTreeMap::<Addr32, Amount>::new();

        for coin in coins {
            let asset = self.remote_asset(coin.token);
            let token = self
                .tokens
                .get(&coin.token)
                .ok_or(BridgeError::TokenNotLinked { asset })?;

            if token.paused {
                return Err(BridgeError::TokenPaused { asset });
            }

            let amount = remove_dust_remote(token.decimals_delta, coin.amount)?;

            // The hub must be able to convert the amount exactly.
            convert_remote_to_synthetic(&token.link(asset, self.address), amount)?;

            let total = amounts.entry(coin.token).or_default();
            *total = total.checked_add(amount).ok_or(BridgeError::Overflow)?;
        }

        let assets = amounts
            .into_iter()
            .map(|(token, amount)| Asset {
                remote: self.remote_asset(token),
                amount,
            })
            .collect::<Vec<_>>();

        let payload = Payload::Deposit {
            recipient,
            assets: assets.clone(),
        }
        .encode();

        Ok(PreparedDeposit {
            hub_chain,
            hub,
            assets,
            payload,
        })
    }

    fn deposit(
        &mut self,
        mut ctx: MutableCtx,
        recipient: Addr32,
        coins: Vec<Coin>,
        options: DeliveryOptions,
    ) -> BridgeResult<Response> {
        let PreparedDeposit {
            hub_chain,
            hub,
            assets,
            payload,
        } = self.prepare_deposit(recipient, &coins)?;

        for asset in &assets {
            let balance = self.bank.balance_of(asset.remote.address, ctx.sender);
            if balance < asset.amount {
                return Err(BridgeError::InsufficientBalance {
                    balance,
                    amount: asset.amount,
                });
            }
        }

        // Check the fee before pulling anything in.
        let fee = ctx.channel.quote(hub_chain, hub, &payload, &options)?;
        if ctx.funds < fee {
            return Err(BridgeError::InsufficientFee {
                required: fee,
                provided: ctx.funds,
            });
        }

        let pending = self
            .locked
            .preview(
                assets
                    .iter()
                    .map(|asset| Entry::Credit(asset.remote.address, asset.amount)),
            )
            .map_err(|_| BridgeError::Overflow)?;

        let mut pulled = Vec::with_capacity(assets.len());
        for asset in &assets {
            if let Err(err) = self.bank.transfer(asset.remote.address, ctx.sender, self.address, asset.amount) {
                self.return_assets(ctx.sender, &pulled);
                return Err(err);
            }
            pulled.push(asset.clone());
        }

        let receipt = match ctx.channel.send(self.address, hub_chain, hub, payload, &options, ctx.funds) {
            Ok(receipt) => receipt,
            Err(err) => {
                self.return_assets(ctx.sender, &pulled);
                return Err(err);
            },
        };

        self.locked.commit(pending);

        tracing::info!(
            sender = %ctx.sender,
            %recipient,
            assets = assets.len(),
            nonce = receipt.nonce,
            "Deposited"
        );

        Ok(Response::new()
            .add_event(Event::Deposited {
                sender: ctx.sender,
                recipient,
                assets,
                nonce: receipt.nonce,
            })
            .add_receipt(receipt))
    }

    /// Undo the transfers of a deposit that failed part way.
    fn return_assets(&mut self, to: Addr32, assets: &[Asset]) {
        for asset in assets {
            if let Err(err) = self.bank.transfer(asset.remote.address, self.address, to, asset.amount) {
                tracing::error!(
                    token = %asset.remote.address,
                    %to,
                    amount = asset.amount,
                    %err,
                    "Failed to return deposited asset"
                );
            }
        }
    }

    fn rescue_tokens(
        &mut self,
        ctx: MutableCtx,
        token: Addr32,
        to: Addr32,
        amount: Amount,
    ) -> BridgeResult<Response> {
        self.ensure_owner(ctx.sender)?;

        let surplus = self.custody_surplus(token);
        if amount > surplus {
            return Err(BridgeError::InsufficientCustody {
                asset: token,
                surplus,
                amount,
            });
        }

        self.bank.transfer(token, self.address, to, amount)?;

        tracing::warn!(%token, %to, amount, "Rescued tokens");

        Ok(Response::new().add_event(Event::TokensRescued { token, to, amount }))
    }

    fn release(&mut self, recipient: Addr32, token: Addr32, amount: Amount) -> BridgeResult<Response> {
        let pending = self
            .locked
            .preview([Entry::Debit(token, amount)])
            .map_err(|err| locked_underflow(token, err))?;

        self.bank.transfer(token, self.address, recipient, amount)?;
        self.locked.commit(pending);

        tracing::info!(%token, %recipient, amount, "Released");

        Ok(Response::new().add_event(Event::Released {
            token,
            recipient,
            amount,
        }))
    }

    /// Pay out an owner-initiated rescue from the hub. Unaccounted custody is
    /// used first; only the remainder is taken from the locked balance.
    fn admin_rescue(&mut self, recipient: Addr32, coins: Vec<Coin>) -> BridgeResult<Response> {
        let mut amounts = BTreeMap::<Addr32, Amount>::new();
        for coin in &coins {
            let total = amounts.entry(coin.token).or_default();
            *total = total.checked_add(coin.amount).ok_or(BridgeError::Overflow)?;
        }

        let mut debits = Vec::with_capacity(amounts.len());
        for (token, amount) in &amounts {
            let custody = self.bank.balance_of(*token, self.address);
            if *amount > custody {
                return Err(BridgeError::InsufficientCustody {
                    asset: *token,
                    surplus: custody,
                    amount: *amount,
                });
            }

            let from_locked = amount.saturating_sub(self.custody_surplus(*token));
            if from_locked > 0 {
                let locked = self.locked.balance_of(token);
                if from_locked > locked {
                    return Err(locked_underflow(*token, LedgerError::Insufficient {
                        balance: locked,
                        amount: from_locked,
                    }));
                }

                debits.push(Entry::Debit(*token, from_locked));
            }
        }

        let pending = self
            .locked
            .preview(debits)
            .map_err(|_| BridgeError::Overflow)?;

        for (token, amount) in &amounts {
            self.bank.transfer(*token, self.address, recipient, *amount)?;
        }

        self.locked.commit(pending);

        tracing::warn!(%recipient, assets = coins.len(), "Paid out admin rescue");

        Ok(Response::new().add_event(Event::AdminRescueReceived {
            recipient,
            assets: coins,
        }))
    }
}

/// A release larger than the locked balance means the hub and this gateway
/// disagree about how much is locked. Never expected; requires an admin.
fn locked_underflow(token: Addr32, err: LedgerError) -> BridgeError {
    match err {
        LedgerError::Insufficient { balance, amount } => {
            tracing::error!(
                %token,
                locked = balance,
                amount,
                "Release exceeds locked balance; hub and gateway accounting diverged"
            );

            BridgeError::InsufficientLockedBalance {
                asset: token,
                locked: balance,
                amount,
            }
        },
        LedgerError::Overflow => BridgeError::Overflow,
    }
}

impl<B> MessageReceiver for Gateway<B>
where
    B: Bank,
{
    fn address(&self) -> Addr32 {
        self.address
    }

    fn on_message(&mut self, lane: &Lane, nonce: Nonce, payload: &[u8]) -> BridgeResult<Response> {
        let config = self.config.snapshot();
        let hub = config.hub.ok_or(BridgeError::NoPeer {
            chain: config.hub_chain,
        })?;

        if lane.src_chain != config.hub_chain || lane.sender != hub {
            tracing::warn!(%lane, nonce, "Rejected message from untrusted sender");

            return Err(BridgeError::UntrustedPeer {
                chain: lane.src_chain,
                expect: hub,
                got: lane.sender,
            });
        }

        let origin = (lane.src_chain, lane.sender);
        if self.processed.get(&origin).is_some_and(|last| nonce <= *last) {
            tracing::debug!(%lane, nonce, "Message already processed");

            return Ok(Response::new());
        }

        let response = match Payload::decode(payload)? {
            Payload::Release {
                recipient,
                remote,
                amount,
            } => self.release(recipient, remote, amount)?,
            Payload::AdminRescue { recipient, assets } => self.admin_rescue(recipient, assets)?,
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
