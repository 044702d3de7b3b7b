use std::io::Read;

use clap::Args;
use url::Url;

use burnbox_daemon::http_server::api::client::ApiError;
use burnbox_daemon::http_server::api::secrets::{CreateRequest, CreateResponse};
use common::prelude::{EnvelopeError, ShareKey, ShareLink};

#[derive(Args, Debug, Clone)]
pub struct Create {
    /// Secret to share. Read from stdin when omitted.
    #[arg(long)]
    pub text: Option<String>,

    /// Origin recipients open the link on (defaults to the remote)
    #[arg(long)]
    pub origin: Option<Url>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("nothing to share: the secret is empty")]
    Empty,
    #[error("failed to read secret from stdin: {0}")]
    Stdin(#[from] std::io::Error),
    #[error("encryption error: {0}")]
    Envelope(#[from] EnvelopeError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Create {
    type Error = CreateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let plaintext = match &self.text {
            Some(text) => text.clone(),
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf.trim_end_matches(['\r', '\n']).to_string()
            }
        };
        if plaintext.is_empty() {
            return Err(CreateError::Empty);
        }

        // Sealed here; only the ciphertext leaves this process
        let key = ShareKey::generate()?;
        let ciphertext = key.seal(&plaintext)?;

        let request = CreateRequest {
            encrypted_data: Some(ciphertext.into_inner()),
        };
        let response: CreateResponse = ctx.client.call(request).await?;

        let origin = self
            .origin
            .clone()
            .unwrap_or_else(|| ctx.client.base_url().clone());
        Ok(ShareLink::new(origin, response.id, key).to_string())
    }
}
