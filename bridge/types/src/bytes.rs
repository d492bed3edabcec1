use {
    serde::{de, Deserialize, Deserializer, Serialize, Serializer},
    std::{
        fmt,
        ops::Deref,
        str::FromStr,
    },
};

/// A fixed-size byte array, serialized as a lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HexByteArray<const N: usize>([u8; N]);

pub type Hash256 = HexByteArray<32>;

/// Verifiers are identified by Ethereum-style addresses: the last 20 bytes of
/// the Keccak-256 hash of the uncompressed public key.
pub type Addr20 = HexByteArray<20>;

impl<const N: usize> HexByteArray<N> {
    pub const LENGTH: usize = N;
    pub const ZERO: Self = Self([0; N]);

    pub const fn from_inner(inner: [u8; N]) -> Self {
        Self(inner)
    }

    pub const fn inner(&self) -> &[u8; N] {
        &self.0
    }

    pub const fn into_inner(self) -> [u8; N] {
        self.0
    }
}

impl<const N: usize> Default for HexByteArray<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> Deref for HexByteArray<N> {
    type Target = [u8; N];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> AsRef<[u8]> for HexByteArray<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> From<[u8; N]> for HexByteArray<N> {
    fn from(inner: [u8; N]) -> Self {
        Self(inner)
    }
}

impl<const N: usize> TryFrom<&[u8]> for HexByteArray<N> {
    type Error = hex::FromHexError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        slice
            .try_into()
            .map(Self)
            .map_err(|_| hex::FromHexError::InvalidStringLength)
    }
}

impl<const N: usize> FromStr for HexByteArray<N> {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut inner = [0; N];
        hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), &mut inner)?;
        Ok(Self(inner))
    }
}

impl<const N: usize> fmt::Display for HexByteArray<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl<const N: usize> fmt::Debug for HexByteArray<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "HexByteArray({})", hex::encode(self.0))
    }
}

impl<const N: usize> Serialize for HexByteArray<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de, const N: usize> Deserialize<'de> for HexByteArray<N> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ----------------------------------- tests -----------------------------------
