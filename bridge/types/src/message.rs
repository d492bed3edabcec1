use {
    crate::{keccak256, Addr32, BridgeError, BridgeResult, Hash256},
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Identifier of a chain connected to the bridge.
pub type ChainId = u32;

pub type Nonce = u64;

/// Token amounts. 256-bit on the wire, see [`crate::Payload`].
pub type Amount = u128;

/// Size of the fixed part of an encoded message:
/// src chain (4) + sender (32) + dst chain (4) + receiver (32) + nonce (8).
pub const MESSAGE_HEADER_LEN: usize = 80;

/// An ordered message path. Nonces are assigned and executed per lane.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lane {
    pub src_chain: ChainId,
    pub sender: Addr32,
    pub dst_chain: ChainId,
    pub receiver: Addr32,
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{}->{}/{}",
            self.src_chain, self.sender, self.dst_chain, self.receiver
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub src_chain: ChainId,
    pub sender: Addr32,
    pub dst_chain: ChainId,
    pub receiver: Addr32,
    pub nonce: Nonce,
    #[serde(with = "hex::serde")]
    pub payload: Vec<u8>,
}

impl Message {
    pub fn lane(&self) -> Lane {
        Lane {
            src_chain: self.src_chain,
            sender: self.sender,
            dst_chain: self.dst_chain,
            receiver: self.receiver,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(MESSAGE_HEADER_LEN + self.payload.len());
        buf.extend(self.src_chain.to_be_bytes());
        buf.extend_from_slice(self.sender.inner());
        buf.extend(self.dst_chain.to_be_bytes());
        buf.extend_from_slice(self.receiver.inner());
        buf.extend(self.nonce.to_be_bytes());
        buf.extend_from_slice(&self.payload);
        buf
    }

    pub fn decode(buf: &[u8]) -> BridgeResult<Self> {
        if buf.len() < MESSAGE_HEADER_LEN {
            return Err(BridgeError::invalid_encoding(format!(
                "message should be at least {MESSAGE_HEADER_LEN} bytes, got: {}",
                buf.len()
            )));
        }

        Ok(Self {
            src_chain: ChainId::from_be_bytes(fixed(&buf[0..4])),
            sender: Addr32::from_inner(fixed(&buf[4..36])),
            dst_chain: ChainId::from_be_bytes(fixed(&buf[36..40])),
            receiver: Addr32::from_inner(fixed(&buf[40..72])),
            nonce: Nonce::from_be_bytes(fixed(&buf[72..80])),
            payload: buf[MESSAGE_HEADER_LEN..].to_vec(),
        })
    }

    /// Keccak-256 hash of the encoded message. This is what verifiers attest to.
    pub fn id(&self) -> Hash256 {
        keccak256(self.encode())
    }

    /// Keccak-256 hash of the payload alone, recorded per nonce once the
    /// message is verified.
    pub fn payload_hash(&self) -> Hash256 {
        keccak256(&self.payload)
    }
}

/// Copy a slice of known length into an array. Callers slice with constant
/// bounds, so the lengths always agree.
pub(crate) fn fixed<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0; N];
    out.copy_from_slice(slice);
    out
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_message() -> Message {
        Message {
            src_chain: 30101,
            sender: Addr32::mock(1),
            dst_chain: 30110,
            receiver: Addr32::mock(2),
            nonce: 7,
            payload: b"hello".to_vec(),
        }
    }

    #[test]
    fn encoding_layout() {
        let message = mock_message();
        let raw = message.encode();

        assert_eq!(raw.len(), MESSAGE_HEADER_LEN + 5);
        assert_eq!(&raw[0..4], &30101u32.to_be_bytes());
        assert_eq!(&raw[4..36], Addr32::mock(1).inner());
        assert_eq!(&raw[72..80], &7u64.to_be_bytes());
        assert_eq!(&raw[80..], b"hello");

        assert_eq!(Message::decode(&raw).unwrap(), message);
    }

    #[test]
    fn decoding_short_buffer_fails() {
        assert!(matches!(
            Message::decode(&[0; 79]),
            Err(BridgeError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn id_commits_to_every_field() {
        let message = mock_message();

        let mut other = message.clone();
        other.nonce += 1;
        assert_ne!(message.id(), other.id());

        let mut other = message.clone();
        other.payload.push(0);
        assert_ne!(message.id(), other.id());
    }
}
