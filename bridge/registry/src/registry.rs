use {
    crate::{check_decimals_delta, DEFAULT_PAGE_LIMIT},
    bridge_types::{
        Addr32, Amount, BridgeError, BridgeResult, ChainId, LinkConfig, RemoteAsset, SyntheticId,
        SyntheticInfo, TokenLink,
    },
    serde::{Deserialize, Serialize},
    std::{
        collections::{BTreeMap, BTreeSet},
        ops::Bound,
    },
};

/// The table of synthetic assets and the remote assets linked to them.
///
/// Invariants:
/// - at most one link per remote asset, and a link's remote asset never
///   changes;
/// - at most one remote asset per (synthetic, chain);
/// - synthetic names are unique.
///
/// Authorization is the caller's job; the registry only checks consistency.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TokenLinkRegistry {
    next_id: SyntheticId,
    synthetics: BTreeMap<SyntheticId, SyntheticInfo>,
    names: BTreeMap<String, SyntheticId>,
    links: BTreeMap<RemoteAsset, TokenLink>,
    by_synthetic: BTreeMap<(SyntheticId, ChainId), RemoteAsset>,
}

impl Default for TokenLinkRegistry {
    fn default() -> Self {
        Self {
            next_id: 1,
            synthetics: BTreeMap::new(),
            names: BTreeMap::new(),
            links: BTreeMap::new(),
            by_synthetic: BTreeMap::new(),
        }
    }
}

impl TokenLinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_synthetic_asset(&mut self, name: String, decimals: u8) -> BridgeResult<SyntheticInfo> {
        if self.names.contains_key(&name) {
            return Err(BridgeError::AlreadyExists { name });
        }

        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(BridgeError::Overflow)?;

        let info = SyntheticInfo {
            id,
            name: name.clone(),
            decimals,
        };

        self.names.insert(name, id);
        self.synthetics.insert(id, info.clone());

        Ok(info)
    }

    /// Link a remote asset. Fails if the remote asset is linked already, even
    /// to the same synthetic.
    pub fn link_remote_token(&mut self, link: TokenLink) -> BridgeResult<&TokenLink> {
        if self.links.contains_key(&link.remote) {
            return Err(BridgeError::AlreadyLinked { asset: link.remote });
        }

        self.check_link(&link)?;

        Ok(self.insert_link(link))
    }

    /// Apply link announcements from the gateway of `chain`. All configs are
    /// validated before any is applied.
    ///
    /// Re-announcing a remote asset for the synthetic and delta it is already
    /// linked with only refreshes its gateway. Its minimum and pause flag stay
    /// under the hub owner's control. Announcing it for another synthetic or
    /// delta fails with `AlreadyLinked`.
    pub fn apply_links(
        &mut self,
        chain: ChainId,
        gateway: Addr32,
        configs: &[LinkConfig],
    ) -> BridgeResult<Vec<TokenLink>> {
        let mut links = Vec::with_capacity(configs.len());
        let mut seen_remotes = BTreeSet::new();
        let mut seen_synthetics = BTreeSet::new();

        for config in configs {
            let remote = RemoteAsset::new(chain, config.remote);

            if !seen_remotes.insert(remote) {
                return Err(BridgeError::AlreadyLinked { asset: remote });
            }

            if !seen_synthetics.insert(config.synthetic) {
                return Err(BridgeError::SyntheticAlreadyLinkedOnChain {
                    synthetic: config.synthetic,
                    chain,
                });
            }

            let info = self.synthetic(config.synthetic).ok_or(BridgeError::UnknownSynthetic {
                synthetic: config.synthetic,
            })?;

            if info.decimals != config.synthetic_decimals {
                return Err(BridgeError::DecimalsMismatch {
                    synthetic: info.id,
                    expect: info.decimals,
                    got: config.synthetic_decimals,
                });
            }

            let mut link = TokenLink {
                remote,
                synthetic: config.synthetic,
                decimals_delta: check_decimals_delta(TokenLink::decimals_delta(
                    config.synthetic_decimals,
                    config.remote_decimals,
                ))?,
                min_bridge_amount: config.min_bridge_amount,
                paused: config.paused,
                gateway,
            };

            match self.links.get(&remote) {
                Some(existing) => {
                    if existing.synthetic != link.synthetic
                        || existing.decimals_delta != link.decimals_delta
                    {
                        return Err(BridgeError::AlreadyLinked { asset: remote });
                    }

                    link.min_bridge_amount = existing.min_bridge_amount;
                    link.paused = existing.paused;
                },
                None => self.check_link(&link)?,
            }

            links.push(link);
        }

        Ok(links
            .into_iter()
            .map(|link| self.insert_link(link).clone())
            .collect())
    }

    pub fn set_paused(&mut self, remote: &RemoteAsset, paused: bool) -> BridgeResult<&TokenLink> {
        let link = self.link_mut(remote)?;
        link.paused = paused;
        Ok(link)
    }

    pub fn set_min_bridge_amount(&mut self, remote: &RemoteAsset, amount: Amount) -> BridgeResult<&TokenLink> {
        let link = self.link_mut(remote)?;
        link.min_bridge_amount = amount;
        Ok(link)
    }

    fn link_mut(&mut self, remote: &RemoteAsset) -> BridgeResult<&mut TokenLink> {
        self.links
            .get_mut(remote)
            .ok_or(BridgeError::TokenNotLinked { asset: *remote })
    }

    fn check_link(&self, link: &TokenLink) -> BridgeResult<()> {
        let info = self.synthetic(link.synthetic).ok_or(BridgeError::UnknownSynthetic {
            synthetic: link.synthetic,
        })?;

        check_decimals_delta(link.decimals_delta as i32)?;

        // The remote decimals implied by the delta must be representable.
        let remote_decimals = info.decimals as i32 - link.decimals_delta as i32;
        if !(0..=u8::MAX as i32).contains(&remote_decimals) {
            return Err(BridgeError::DecimalsOutOfRange {
                delta: link.decimals_delta as i32,
            });
        }

        if let Some(other) = self.by_synthetic.get(&(link.synthetic, link.remote.chain)) {
            if *other != link.remote {
                return Err(BridgeError::SyntheticAlreadyLinkedOnChain {
                    synthetic: link.synthetic,
                    chain: link.remote.chain,
                });
            }
        }

        Ok(())
    }

    fn insert_link(&mut self, link: TokenLink) -> &TokenLink {
        self.by_synthetic
            .insert((link.synthetic, link.remote.chain), link.remote);

        let remote = link.remote;
        self.links.insert(remote, link);
        &self.links[&remote]
    }

    // --------------------------------- queries -------------------------------

    pub fn synthetic(&self, id: SyntheticId) -> Option<&SyntheticInfo> {
        self.synthetics.get(&id)
    }

    pub fn synthetic_by_name(&self, name: &str) -> Option<&SyntheticInfo> {
        self.names.get(name).and_then(|id| self.synthetics.get(id))
    }

    pub fn synthetics(&self, start_after: Option<SyntheticId>, limit: Option<u32>) -> Vec<&SyntheticInfo> {
        let start = start_after.map_or(Bound::Unbounded, Bound::Excluded);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        self.synthetics
            .range((start, Bound::Unbounded))
            .take(limit as usize)
            .map(|(_, info)| info)
            .collect()
    }

    pub fn link(&self, remote: &RemoteAsset) -> Option<&TokenLink> {
        self.links.get(remote)
    }

    /// The link backing `synthetic` on `chain`.
    pub fn link_for(&self, synthetic: SyntheticId, chain: ChainId) -> Option<&TokenLink> {
        self.by_synthetic
            .get(&(synthetic, chain))
            .and_then(|remote| self.links.get(remote))
    }

    pub fn links_of(&self, synthetic: SyntheticId) -> Vec<&TokenLink> {
        self.by_synthetic
            .range((synthetic, ChainId::MIN)..=(synthetic, ChainId::MAX))
            .filter_map(|(_, remote)| self.links.get(remote))
            .collect()
    }

    pub fn links(&self, start_after: Option<RemoteAsset>, limit: Option<u32>) -> Vec<&TokenLink> {
        let start = start_after.map_or(Bound::Unbounded, Bound::Excluded);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        self.links
            .range((start, Bound::Unbounded))
            .take(limit as usize)
            .map(|(_, link)| link)
            .collect()
    }
}

// ----------------------------------- tests -----------------------------------
