//! Personal-message signing.
//!
//! The signing backend is a collaborator behind [`PersonalSigner`]. Whatever
//! shape its signature comes back in, [`personal_sign`] turns it into the
//! `{v, r, s}` triple the exchange contract recovers, with `v` in `{27, 28}`.

mod local;

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::EcSignature;

pub use local::LocalSigner;

/// A signature as returned by a signing backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawSignature {
    /// `r ‖ s ‖ v`, 65 bytes
    Concatenated(Bytes),
    /// Separate components; `v` may be 0/1, 27/28 or EIP-155 encoded
    Components { v: u64, r: B256, s: B256 },
}

/// Failure reported by a signing backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// The user declined the request
    Rejected(String),
    /// No signer, or no account for the requested address
    Unavailable(String),
    /// Anything else
    Other(String),
}

impl fmt::Display for SignerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerError::Rejected(msg) => write!(f, "rejected: {}", msg),
            SignerError::Unavailable(msg) => write!(f, "unavailable: {}", msg),
            SignerError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<SignerError> for Error {
    fn from(err: SignerError) -> Self {
        match err {
            SignerError::Rejected(msg) => Error::SigningRejected(msg),
            SignerError::Unavailable(msg) => Error::SigningUnavailable(msg),
            SignerError::Other(msg) => Error::Signing(msg),
        }
    }
}

/// A backend able to produce personal-message signatures
///
/// Implementations apply the `"\x19Ethereum Signed Message:\n"` prefix
/// themselves, the way wallets do for `personal_sign`.
#[async_trait]
pub trait PersonalSigner: Send + Sync {
    async fn sign_personal_message(
        &self,
        address: Address,
        message: &[u8],
    ) -> std::result::Result<RawSignature, SignerError>;
}

/// Normalize a recovery id to 27 or 28
fn normalize_v(v: u64) -> Result<u8> {
    match v {
        0 | 1 => Ok(v as u8 + 27),
        27 | 28 => Ok(v as u8),
        // EIP-155: v = chain_id * 2 + 35 + parity
        v if v >= 35 => Ok(((v - 35) % 2) as u8 + 27),
        other => Err(Error::Signing(format!("invalid recovery id {}", other))),
    }
}

/// Turn any [`RawSignature`] into the contract's `{v, r, s}` form
pub fn normalize_signature(raw: RawSignature) -> Result<EcSignature> {
    match raw {
        RawSignature::Concatenated(bytes) => {
            if bytes.len() != 65 {
                return Err(Error::Signing(format!(
                    "expected a 65 byte signature, got {} bytes",
                    bytes.len()
                )));
            }
            Ok(EcSignature {
                r: B256::from_slice(&bytes[..32]),
                s: B256::from_slice(&bytes[32..64]),
                v: normalize_v(u64::from(bytes[64]))?,
            })
        }
        RawSignature::Components { v, r, s } => Ok(EcSignature {
            v: normalize_v(v)?,
            r,
            s,
        }),
    }
}

/// Ask `signer` for a personal signature over `message` from `address`
///
/// # Errors
///
/// - [`Error::SigningRejected`] if the user declines
/// - [`Error::SigningUnavailable`] if no signer or account is connected
pub async fn personal_sign<S>(signer: &S, message: &[u8], address: Address) -> Result<EcSignature>
where
    S: PersonalSigner + ?Sized,
{
    debug!(%address, len = message.len(), "requesting personal signature");
    let raw = signer
        .sign_personal_message(address, message)
        .await
        .map_err(|e| {
            warn!(%address, error = %e, "personal signature failed");
            Error::from(e)
        })?;
    normalize_signature(raw)
}
