use {
    bridge_types::{Addr20, Addr32, Amount, ChainId, FeeSchedule},
    config_parser::ConfigParser,
    serde::Deserialize,
    std::path::{Path, PathBuf},
};

/// Environment variables starting with `BRIDGE__` override the file, e.g.
/// `BRIDGE__VERIFIERS__THRESHOLD=3`.
pub const ENV_PREFIX: &str = "BRIDGE";

/// A hub chain and its spoke chains, with everything needed to bring them up.
#[derive(Deserialize, Debug, Clone)]
pub struct DeploymentConfig {
    pub hub_chain: ChainId,
    pub fee: FeeConfig,
    pub verifiers: VerifiersConfig,
    pub synthetics: Vec<SyntheticConfig>,
    pub spokes: Vec<SpokeConfig>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct FeeConfig {
    pub base_fee: u64,
    pub per_byte_fee: u64,
    pub gas_price: u64,
}

impl FeeConfig {
    pub fn schedule(&self) -> FeeSchedule {
        FeeSchedule {
            base_fee: self.base_fee as Amount,
            per_byte_fee: self.per_byte_fee as Amount,
            gas_price: self.gas_price as Amount,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct VerifiersConfig {
    /// Key seeds of the mock verifiers.
    pub seeds: Vec<u8>,
    pub threshold: u32,
    pub confirmations: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SyntheticConfig {
    pub name: String,
    pub decimals: u8,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SpokeConfig {
    pub chain: ChainId,
    pub tokens: Vec<TokenFixture>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TokenFixture {
    pub symbol: String,
    pub address: Addr20,
    pub decimals: u8,
    /// Name of the synthetic asset the token is linked to.
    pub synthetic: String,
    pub min_bridge_amount: u64,
}

impl TokenFixture {
    pub fn token(&self) -> Addr32 {
        self.address.into()
    }
}

impl DeploymentConfig {
    pub fn load<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        Ok(ConfigParser::parse_with_prefix(path.as_ref(), Some(ENV_PREFIX))?)
    }

    /// The deployment described in `fixtures/deployment.toml`.
    pub fn fixture() -> anyhow::Result<Self> {
        Self::load(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/deployment.toml"))
    }

    pub fn spoke(&self, chain: ChainId) -> Option<&SpokeConfig> {
        self.spokes.iter().find(|spoke| spoke.chain == chain)
    }

    pub fn token(&self, chain: ChainId, symbol: &str) -> Option<&TokenFixture> {
        self.spoke(chain)
            .and_then(|spoke| spoke.tokens.iter().find(|token| token.symbol == symbol))
    }
}

// ----------------------------------- tests -----------------------------------
