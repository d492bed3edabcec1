use {
    crate::Hub,
    bridge_registry::{remote_to_synthetic, TokenLinkRegistry},
    bridge_types::{
        hub::Config, Addr32, Amount, BridgeError, BridgeResult, ChainId, Coin, DeliveryOptions,
        MessageChannel, Nonce, RemoteAsset, SyntheticAsset, SyntheticId, SyntheticInfo, TokenLink,
        Versioned,
    },
};

impl Hub {
    pub fn address(&self) -> Addr32 {
        self.address
    }

    pub fn config(&self) -> &Versioned<Config> {
        &self.config
    }

    pub fn peers(&self) -> impl Iterator<Item = (&ChainId, &Addr32)> {
        self.config.get().peers.iter()
    }

    /// The gateway that last announced links for `chain`.
    pub fn gateway(&self, chain: ChainId) -> Option<Addr32> {
        self.gateways.get(&chain).copied()
    }

    pub fn registry(&self) -> &TokenLinkRegistry {
        &self.registry
    }

    pub fn synthetic(&self, id: SyntheticId) -> Option<SyntheticAsset> {
        self.registry
            .synthetic(id)
            .map(|info| self.with_supply(info))
    }

    pub fn synthetic_by_name(&self, name: &str) -> Option<SyntheticAsset> {
        self.registry
            .synthetic_by_name(name)
            .map(|info| self.with_supply(info))
    }

    pub fn synthetics(&self, start_after: Option<SyntheticId>, limit: Option<u32>) -> Vec<SyntheticAsset> {
        self.registry
            .synthetics(start_after, limit)
            .into_iter()
            .map(|info| self.with_supply(info))
            .collect()
    }

    fn with_supply(&self, info: &SyntheticInfo) -> SyntheticAsset {
        SyntheticAsset {
            id: info.id,
            name: info.name.clone(),
            decimals: info.decimals,
            total_supply: self.supply.balance_of(&info.id),
        }
    }

    pub fn link(&self, remote: &RemoteAsset) -> Option<&TokenLink> {
        self.registry.link(remote)
    }

    pub fn links(&self, start_after: Option<RemoteAsset>, limit: Option<u32>) -> Vec<&TokenLink> {
        self.registry.links(start_after, limit)
    }

    pub fn balance(&self, synthetic: SyntheticId, owner: Addr32) -> Amount {
        self.balances.balance_of(&(synthetic, owner))
    }

    pub fn total_supply(&self, synthetic: SyntheticId) -> Amount {
        self.supply.balance_of(&synthetic)
    }

    /// Collateral the gateway of `remote.chain` is believed to hold locked,
    /// in remote units.
    pub fn backing(&self, remote: &RemoteAsset) -> Amount {
        self.backing.balance_of(remote)
    }

    pub fn last_processed_nonce(&self, src_chain: ChainId, sender: Addr32) -> Nonce {
        self.processed
            .get(&(src_chain, sender))
            .copied()
            .unwrap_or(0)
    }

    /// The fee a bridge-back would cost. Runs every check `BridgeBack` does
    /// except the sender's balance and the destination's backing.
    #[allow(clippy::too_many_arguments)]
    pub fn quote_bridge_back(
        &self,
        channel: &dyn MessageChannel,
        sender: Addr32,
        synthetic: SyntheticId,
        amount: Amount,
        dst_chain: ChainId,
        recipient: Option<Addr32>,
        options: &DeliveryOptions,
    ) -> BridgeResult<Amount> {
        let prepared = self.prepare_bridge_back(sender, synthetic, amount, dst_chain, recipient)?;

        channel.quote(dst_chain, prepared.peer, &prepared.payload, options)
    }

    pub fn quote_admin_rescue(
        &self,
        channel: &dyn MessageChannel,
        chain: ChainId,
        recipient: Addr32,
        assets: &[Coin],
        options: &DeliveryOptions,
    ) -> BridgeResult<Amount> {
        let (peer, payload) = self.prepare_admin_rescue(chain, recipient, assets)?;

        channel.quote(chain, peer, &payload, options)
    }

    /// Check that, for every synthetic asset, the holders' balances, the
    /// total supply and the backing of its links agree.
    pub fn check_conservation(&self) -> BridgeResult<()> {
        for info in self.registry.synthetics(None, Some(u32::MAX)) {
            let supply = self.supply.balance_of(&info.id);

            let backing = self
                .registry
                .links_of(info.id)
                .into_iter()
                .try_fold(0 as Amount, |acc, link| {
                    let amount = remote_to_synthetic(
                        link.decimals_delta,
                        self.backing.balance_of(&link.remote),
                    )?;
                    acc.checked_add(amount).ok_or(BridgeError::Overflow)
                })?;

            if supply != backing {
                return Err(BridgeError::SupplyMismatch {
                    synthetic: info.id,
                    supply,
                    backing,
                });
            }

            let held = self
                .balances
                .iter()
                .filter(|((synthetic, _), _)| *synthetic == info.id)
                .try_fold(0 as Amount, |acc, (_, amount)| acc.checked_add(*amount))
                .ok_or(BridgeError::Overflow)?;

            if held != supply {
                return Err(BridgeError::SupplyMismatch {
                    synthetic: info.id,
                    supply,
                    backing: held,
                });
            }
        }

        Ok(())
    }
}
