use {
    crate::Gateway,
    bridge_registry::DEFAULT_PAGE_LIMIT,
    bridge_types::{
        gateway::{Config, GatewayToken, TokenConfig},
        Addr32, Amount, Bank, BridgeResult, ChainId, Coin, DeliveryOptions, MessageChannel, Nonce,
        Payload, Versioned,
    },
    std::ops::Bound,
};

impl<B> Gateway<B>
where
    B: Bank,
{
    pub fn address(&self) -> Addr32 {
        self.address
    }

    pub fn config(&self) -> &Versioned<Config> {
        &self.config
    }

    pub fn token(&self, token: &Addr32) -> Option<&GatewayToken> {
        self.tokens.get(token)
    }

    pub fn tokens(&self, start_after: Option<Addr32>, limit: Option<u32>) -> Vec<&GatewayToken> {
        let start = start_after.map_or(Bound::Unbounded, Bound::Excluded);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        self.tokens
            .range((start, Bound::Unbounded))
            .take(limit as usize)
            .map(|(_, token)| token)
            .collect()
    }

    /// Number of tokens that currently accept deposits.
    pub fn available_token_count(&self) -> usize {
        self.tokens.values().filter(|token| !token.paused).count()
    }

    /// Custody owed to holders of the synthetic on the hub.
    pub fn locked_balance(&self, token: &Addr32) -> Amount {
        self.locked.balance_of(token)
    }

    pub fn locked_balances(&self) -> impl Iterator<Item = (&Addr32, &Amount)> {
        self.locked.iter()
    }

    /// Everything the gateway holds of `token`, locked or not.
    pub fn custody(&self, token: Addr32) -> Amount {
        self.bank.balance_of(token, self.address)
    }

    /// Custody in excess of the locked balance, e.g. tokens sent to the
    /// gateway directly. Only this part can be rescued.
    pub fn custody_surplus(&self, token: Addr32) -> Amount {
        self.custody(token)
            .saturating_sub(self.locked.balance_of(&token))
    }

    pub fn last_processed_nonce(&self, src_chain: ChainId, sender: Addr32) -> Nonce {
        self.processed
            .get(&(src_chain, sender))
            .copied()
            .unwrap_or(0)
    }

    /// The fee a deposit would cost. Runs every check `Deposit` does except
    /// the depositor's balance.
    pub fn quote_deposit(
        &self,
        channel: &dyn MessageChannel,
        recipient: Addr32,
        assets: &[Coin],
        options: &DeliveryOptions,
    ) -> BridgeResult<Amount> {
        let prepared = self.prepare_deposit(recipient, assets)?;

        channel.quote(prepared.hub_chain, prepared.hub, &prepared.payload, options)
    }

    pub fn quote_link_token_to_hub(
        &self,
        channel: &dyn MessageChannel,
        configs: &[TokenConfig],
        options: &DeliveryOptions,
    ) -> BridgeResult<Amount> {
        let (hub_chain, hub) = self.hub()?;
        let (_, configs) = self.prepare_links(configs)?;

        channel.quote(hub_chain, hub, &Payload::LinkTokens { configs }.encode(), options)
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }
}
