use alloy_primitives::{Address, Bytes};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use super::{PersonalSigner, RawSignature, SignerError};

/// [`PersonalSigner`] backed by an in-process private key
#[derive(Debug, Clone)]
pub struct LocalSigner {
    signer: PrivateKeySigner,
}

impl LocalSigner {
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }

    /// The only address this signer can sign for
    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

impl From<PrivateKeySigner> for LocalSigner {
    fn from(signer: PrivateKeySigner) -> Self {
        Self::new(signer)
    }
}

#[async_trait]
impl PersonalSigner for LocalSigner {
    async fn sign_personal_message(
        &self,
        address: Address,
        message: &[u8],
    ) -> Result<RawSignature, SignerError> {
        if address != self.signer.address() {
            return Err(SignerError::Unavailable(format!(
                "no key for {}",
                address
            )));
        }
        let signature = self
            .signer
            .sign_message(message)
            .await
            .map_err(|e| SignerError::Other(e.to_string()))?;
        Ok(RawSignature::Concatenated(Bytes::from(
            signature.as_bytes().to_vec(),
        )))
    }
}
