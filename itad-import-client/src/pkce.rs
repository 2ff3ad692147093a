//! PKCE (RFC 7636) verifier/challenge pairs and OAuth state values.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Challenge method sent with the authorization request.
pub const CHALLENGE_METHOD: &str = "S256";

const VERIFIER_BYTES: usize = 32;
const STATE_BYTES: usize = 16;

/// A code verifier and its S256 challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pkce {
    pub verifier: String,
    pub challenge: String,
}

impl Pkce {
    /// Fresh pair from 32 random bytes.
    pub fn generate() -> Self {
        Self::from_verifier(random_token(VERIFIER_BYTES))
    }

    pub fn from_verifier(verifier: impl Into<String>) -> Self {
        let verifier = verifier.into();
        let challenge = code_challenge(&verifier);
        Self {
            verifier,
            challenge,
        }
    }
}

/// base64url(SHA-256(verifier)), unpadded.
pub fn code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Random value for the `state` parameter.
pub fn generate_state() -> String {
    random_token(STATE_BYTES)
}

fn random_token(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
