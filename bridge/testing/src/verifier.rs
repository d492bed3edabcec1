use {
    bridge_types::{verifier_address, Addr20, Attestation, Message, VerifierSet},
    k256::ecdsa::SigningKey,
};

/// An off-chain verifier with a deterministic key.
#[derive(Debug, Clone)]
pub struct MockVerifier {
    key: SigningKey,
    address: Addr20,
}

impl MockVerifier {
    pub fn new(seed: u8) -> Self {
        let key = SigningKey::from_slice(&[seed; 32]).expect("invalid verifier seed");
        let address = verifier_address(key.verifying_key());

        Self { key, address }
    }

    pub fn address(&self) -> Addr20 {
        self.address
    }

    pub fn attest(&self, message: &Message, confirmations: u64) -> Attestation {
        Attestation::sign(&self.key, message.id(), confirmations).expect("failed to sign attestation")
    }
}

/// The verifier set made of the given mock verifiers.
pub fn verifier_set(verifiers: &[MockVerifier], threshold: u32, confirmations: u64) -> VerifierSet {
    VerifierSet {
        threshold,
        verifiers: verifiers.iter().map(MockVerifier::address).collect(),
        confirmations,
    }
}
