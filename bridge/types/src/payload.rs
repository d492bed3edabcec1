use {
    crate::{message::fixed, Addr32, Amount, BridgeError, BridgeResult, ChainId, RemoteAsset, SyntheticId},
    serde::{Deserialize, Serialize},
    strum_macros::{Display, FromRepr},
};

/// Maximum number of entries in a list-typed payload field.
pub const MAX_PAYLOAD_ITEMS: usize = 32;

const WORD: usize = 32;

/// Leading type tag of an encoded payload.
#[derive(Serialize, Deserialize, Display, FromRepr, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum PayloadKind {
    Deposit = 1,
    LinkTokens = 2,
    Release = 3,
    AdminRescue = 4,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub remote: RemoteAsset,
    pub amount: Amount,
}

/// An amount of a token native to the chain the message is delivered to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    pub token: Addr32,
    pub amount: Amount,
}

/// Link parameters a gateway announces to the hub for one of its tokens.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    pub remote: Addr32,
    pub remote_decimals: u8,
    pub synthetic: SyntheticId,
    pub synthetic_decimals: u8,
    pub min_bridge_amount: Amount,
    pub paused: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    /// Gateway -> hub: assets were locked, mint the synthetic counterpart.
    Deposit {
        recipient: Addr32,
        assets: Vec<Asset>,
    },
    /// Gateway -> hub: announce token links.
    LinkTokens { configs: Vec<LinkConfig> },
    /// Hub -> gateway: synthetic was burned, unlock the real asset.
    Release {
        recipient: Addr32,
        remote: Addr32,
        amount: Amount,
    },
    /// Hub -> gateway: owner-initiated unlock without a burn.
    AdminRescue {
        recipient: Addr32,
        assets: Vec<Coin>,
    },
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Deposit { .. } => PayloadKind::Deposit,
            Payload::LinkTokens { .. } => PayloadKind::LinkTokens,
            Payload::Release { .. } => PayloadKind::Release,
            Payload::AdminRescue { .. } => PayloadKind::AdminRescue,
        }
    }

    /// Encode as a one-byte type tag followed by 32-byte words. Integers are
    /// big-endian and right-aligned in their word; amounts take a full 256-bit
    /// word to conform to EVM conventions.
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = Writer::new(self.kind());

        match self {
            Payload::Deposit { recipient, assets } => {
                writer.address(recipient);
                writer.uint(assets.len() as u128);
                for asset in assets {
                    writer.uint(asset.remote.chain as u128);
                    writer.address(&asset.remote.address);
                    writer.uint(asset.amount);
                }
            },
            Payload::LinkTokens { configs } => {
                writer.uint(configs.len() as u128);
                for config in configs {
                    writer.address(&config.remote);
                    writer.uint(config.remote_decimals as u128);
                    writer.uint(config.synthetic as u128);
                    writer.uint(config.synthetic_decimals as u128);
                    writer.uint(config.min_bridge_amount);
                    writer.uint(config.paused as u128);
                }
            },
            Payload::Release {
                recipient,
                remote,
                amount,
            } => {
                writer.address(recipient);
                writer.address(remote);
                writer.uint(*amount);
            },
            Payload::AdminRescue { recipient, assets } => {
                writer.address(recipient);
                writer.uint(assets.len() as u128);
                for coin in assets {
                    writer.address(&coin.token);
                    writer.uint(coin.amount);
                }
            },
        }

        writer.finish()
    }

    pub fn decode(buf: &[u8]) -> BridgeResult<Self> {
        let (tag, body) = buf
            .split_first()
            .ok_or_else(|| BridgeError::invalid_encoding("empty payload"))?;

        let kind = PayloadKind::from_repr(*tag)
            .ok_or_else(|| BridgeError::invalid_encoding(format!("unknown payload tag: {tag}")))?;

        let mut reader = Reader::new(body);

        let payload = match kind {
            PayloadKind::Deposit => {
                let recipient = reader.address()?;
                let len = reader.len()?;
                let mut assets = Vec::with_capacity(len);
                for _ in 0..len {
                    let chain = reader.chain()?;
                    let address = reader.address()?;
                    let amount = reader.amount()?;
                    assets.push(Asset {
                        remote: RemoteAsset::new(chain, address),
                        amount,
                    });
                }
                Payload::Deposit { recipient, assets }
            },
            PayloadKind::LinkTokens => {
                let len = reader.len()?;
                let mut configs = Vec::with_capacity(len);
                for _ in 0..len {
                    configs.push(LinkConfig {
                        remote: reader.address()?,
                        remote_decimals: reader.u8()?,
                        synthetic: reader.chain()?,
                        synthetic_decimals: reader.u8()?,
                        min_bridge_amount: reader.amount()?,
                        paused: reader.bool()?,
                    });
                }
                Payload::LinkTokens { configs }
            },
            PayloadKind::Release => Payload::Release {
                recipient: reader.address()?,
                remote: reader.address()?,
                amount: reader.amount()?,
            },
            PayloadKind::AdminRescue => {
                let recipient = reader.address()?;
                let len = reader.len()?;
                let mut assets = Vec::with_capacity(len);
                for _ in 0..len {
                    assets.push(Coin {
                        token: reader.address()?,
                        amount: reader.amount()?,
                    });
                }
                Payload::AdminRescue { recipient, assets }
            },
        };

        reader.finish()?;

        Ok(payload)
    }
}

// --------------------------------- encoding ----------------------------------

struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn new(kind: PayloadKind) -> Self {
        let mut buf = Vec::with_capacity(1 + 4 * WORD);
        buf.push(kind as u8);
        Self { buf }
    }

    fn address(&mut self, address: &Addr32) {
        self.buf.extend_from_slice(address.inner());
    }

    fn uint(&mut self, value: u128) {
        self.buf.extend([0; 16]);
        self.buf.extend(value.to_be_bytes());
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn word(&mut self) -> BridgeResult<[u8; WORD]> {
        if self.buf.len() < WORD {
            return Err(BridgeError::invalid_encoding(format!(
                "payload truncated: expecting {WORD} more bytes, got {}",
                self.buf.len()
            )));
        }

        let (word, rest) = self.buf.split_at(WORD);
        self.buf = rest;

        Ok(fixed(word))
    }

    fn address(&mut self) -> BridgeResult<Addr32> {
        self.word().map(Addr32::from_inner)
    }

    /// Read a 256-bit word that must fit in 128 bits. A larger value on the
    /// wire is rejected rather than truncated.
    fn amount(&mut self) -> BridgeResult<u128> {
        let word = self.word()?;

        if word[..16].iter().any(|&b| b != 0) {
            return Err(BridgeError::invalid_encoding(
                "amount does not fit in 128 bits",
            ));
        }

        Ok(u128::from_be_bytes(fixed(&word[16..])))
    }

    fn bounded(&mut self, max: u128, what: &str) -> BridgeResult<u128> {
        let value = self.amount()?;

        if value > max {
            return Err(BridgeError::invalid_encoding(format!(
                "{what} out of range: {value}"
            )));
        }

        Ok(value)
    }

    fn chain(&mut self) -> BridgeResult<u32> {
        self.bounded(u32::MAX as u128, "u32 value").map(|v| v as u32)
    }

    fn u8(&mut self) -> BridgeResult<u8> {
        self.bounded(u8::MAX as u128, "u8 value").map(|v| v as u8)
    }

    fn bool(&mut self) -> BridgeResult<bool> {
        self.bounded(1, "bool value").map(|v| v == 1)
    }

    fn len(&mut self) -> BridgeResult<usize> {
        self.bounded(MAX_PAYLOAD_ITEMS as u128, "list length")
            .map(|v| v as usize)
    }

    fn finish(self) -> BridgeResult<()> {
        if !self.buf.is_empty() {
            return Err(BridgeError::invalid_encoding(format!(
                "{} trailing bytes after payload",
                self.buf.len()
            )));
        }

        Ok(())
    }
}

// ----------------------------------- tests -----------------------------------
