use {
    crate::{Addr20, BridgeError, BridgeResult, Hash256, HexByteArray},
    k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey},
    serde::{Deserialize, Serialize},
    sha3::{Digest, Keccak256},
};

pub fn keccak256<T>(data: T) -> Hash256
where
    T: AsRef<[u8]>,
{
    Hash256::from_inner(Keccak256::digest(data.as_ref()).into())
}

// https://docs.rs/web3/latest/src/web3/signing.rs.html#226-236
pub fn eip191_hash<T>(message: T) -> Hash256
where
    T: AsRef<[u8]>,
{
    let mut preimage = b"\x19Ethereum Signed Message:\n".to_vec();
    preimage.extend(message.as_ref().len().to_string().as_bytes());
    preimage.extend(message.as_ref());
    keccak256(preimage)
}

/// The hash a verifier signs to attest that a message was observed on the
/// source chain with the given number of block confirmations.
pub fn attestation_digest(message_id: Hash256, confirmations: u64) -> Hash256 {
    // message_id: 32
    // confirmations: 8
    let mut preimage = [0u8; 40];
    preimage[..32].copy_from_slice(message_id.inner());
    preimage[32..].copy_from_slice(&confirmations.to_be_bytes());
    eip191_hash(preimage)
}

/// Ethereum-style address of a verifier key.
pub fn verifier_address(vk: &VerifyingKey) -> Addr20 {
    // We need the _uncompressed_ pubkey for deriving Ethereum address.
    let pk = vk.to_encoded_point(false);
    let pk_hash = keccak256(&pk.as_bytes()[1..]);

    let mut address = [0; 20];
    address.copy_from_slice(&pk_hash[12..]);

    Addr20::from_inner(address)
}

/// A verifier's signed statement about a message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Attestation {
    pub confirmations: u64,
    /// 64-byte signature followed by the recovery id, offset by 27 as in
    /// Ethereum.
    pub signature: HexByteArray<65>,
}

impl Attestation {
    pub fn sign(sk: &SigningKey, message_id: Hash256, confirmations: u64) -> BridgeResult<Self> {
        let digest = attestation_digest(message_id, confirmations);

        let (signature, recovery_id) = sk
            .sign_prehash_recoverable(digest.inner())
            .map_err(|err| BridgeError::InvalidSignature {
                reason: err.to_string(),
            })?;

        let mut packed = [0u8; 65];
        packed[..64].copy_from_slice(&signature.to_bytes());
        packed[64] = recovery_id.to_byte() + 27;

        Ok(Self {
            confirmations,
            signature: packed.into(),
        })
    }

    /// Recover the address of the verifier that signed this attestation.
    pub fn recover(&self, message_id: Hash256) -> BridgeResult<Addr20> {
        let digest = attestation_digest(message_id, self.confirmations);

        let invalid = |reason: String| BridgeError::InvalidSignature { reason };

        let signature =
            Signature::from_slice(&self.signature[..64]).map_err(|err| invalid(err.to_string()))?;

        // Ethereum uses recovery IDs 27, 28 instead of 0, 1.
        let recovery_id = self.signature[64]
            .checked_sub(27)
            .and_then(RecoveryId::from_byte)
            .ok_or_else(|| invalid(format!("bad recovery id: {}", self.signature[64])))?;

        let vk = VerifyingKey::recover_from_prehash(digest.inner(), &signature, recovery_id)
            .map_err(|err| invalid(err.to_string()))?;

        Ok(verifier_address(&vk))
    }
}

// ----------------------------------- tests -----------------------------------
