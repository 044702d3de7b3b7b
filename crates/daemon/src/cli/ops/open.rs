use clap::Args;
use url::Url;

use burnbox_daemon::http_server::api::client::{ApiClient, ApiError};
use burnbox_daemon::http_server::api::secrets::{TakeRequest, TakeResponse};
use common::prelude::{Ciphertext, EnvelopeError, LinkError, ShareLink};

#[derive(Args, Debug, Clone)]
pub struct Open {
    /// Share link, key fragment included
    pub link: String,

    /// Fetch from this daemon instead of the link's origin
    #[arg(long)]
    pub via: Option<Url>,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("invalid link: {0}")]
    Link(#[from] LinkError),
    #[error("secret not found or already opened")]
    NotFound,
    #[error("API error: {0}")]
    Api(ApiError),
    #[error("server returned an empty secret")]
    Empty,
    #[error("could not decrypt the secret: {0}")]
    Decrypt(#[from] EnvelopeError),
}

impl From<ApiError> for OpenError {
    fn from(e: ApiError) -> Self {
        if e.is_not_found() {
            OpenError::NotFound
        } else {
            OpenError::Api(e)
        }
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Open {
    type Error = OpenError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let link = ShareLink::parse(&self.link)?;

        let base = self.via.clone().unwrap_or_else(|| link.origin().clone());
        let client = ApiClient::new(&base)?;

        // The request carries the id only; the key stays in `link`
        let response: TakeResponse = client.call(TakeRequest { id: *link.id() }).await?;

        reveal(&link, response)
    }
}

/// Decrypt a fetched secret with the key carried in its link
fn reveal(link: &ShareLink, response: TakeResponse) -> Result<String, OpenError> {
    let ciphertext = Ciphertext::new(response.encrypted_data).map_err(|_| OpenError::Empty)?;
    Ok(link.key().open(&ciphertext)?)
}
