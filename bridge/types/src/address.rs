use {
    crate::{Addr20, BridgeError, HexByteArray},
    serde::{Deserialize, Serialize},
    std::{fmt, str::FromStr},
};

/// Bridge addresses are left-padded to 32 bytes, so that 20-byte EVM addresses
/// and 32-byte addresses of other chains share one wire representation.
#[derive(Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Addr32(HexByteArray<32>);

impl Addr32 {
    pub const ZERO: Self = Self(HexByteArray::ZERO);

    pub const fn from_inner(inner: [u8; 32]) -> Self {
        Self(HexByteArray::from_inner(inner))
    }

    pub const fn inner(&self) -> &[u8; 32] {
        self.0.inner()
    }

    pub const fn into_inner(self) -> [u8; 32] {
        self.0.into_inner()
    }

    /// Generate a deterministic address for use in tests.
    pub const fn mock(index: u8) -> Self {
        let mut inner = [0; 32];
        inner[31] = index;
        inner[12] = 0xad;
        Self::from_inner(inner)
    }
}

impl From<Addr20> for Addr32 {
    fn from(addr: Addr20) -> Self {
        let mut addr32 = [0; 32];
        addr32[12..].copy_from_slice(addr.inner());
        Self::from_inner(addr32)
    }
}

impl TryFrom<Addr32> for Addr20 {
    type Error = BridgeError;

    fn try_from(addr32: Addr32) -> Result<Self, Self::Error> {
        if addr32.inner()[..12].iter().any(|&b| b != 0) {
            return Err(BridgeError::InvalidEncoding {
                reason: "left 12 bytes of address are not all zero".to_string(),
            });
        }

        let mut addr = [0; 20];
        addr.copy_from_slice(&addr32.inner()[12..]);

        Ok(Addr20::from_inner(addr))
    }
}

impl FromStr for Addr32 {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for Addr32 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", self.0)
    }
}

impl fmt::Debug for Addr32 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Addr32(0x{})", self.0)
    }
}

// ----------------------------------- tests -----------------------------------
