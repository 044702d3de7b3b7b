//! Share links
//!
//! A share link has the shape `{origin}/view/{id}#{key}`. Browsers and HTTP
//! clients strip the fragment before a request leaves the machine, so the
//! server only ever learns the id. [`ShareLink::retrieve_url`] is the one URL
//! derived from a link that is meant to be sent anywhere, and it carries
//! neither fragment nor query.

use std::fmt;

use url::Url;

use crate::crypto::{EnvelopeError, ShareKey};
use crate::secret_id::SecretId;

const VIEW_SEGMENT: &str = "view";
const RETRIEVE_PATH: &str = "api/secrets";

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("url cannot carry a path")]
    NotABase,
    #[error("link does not name a secret (expected /view/<id>)")]
    MissingId,
    #[error("link is missing its key fragment")]
    MissingKey,
    #[error("link names an invalid secret id")]
    InvalidId,
    #[error("link carries an invalid key: {0}")]
    InvalidKey(#[from] EnvelopeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    origin: Url,
    id: SecretId,
    key: ShareKey,
}

impl ShareLink {
    pub fn new(origin: Url, id: SecretId, key: ShareKey) -> Self {
        Self {
            origin: bare(origin),
            id,
            key,
        }
    }

    pub fn parse(link: &str) -> Result<Self, LinkError> {
        let url = Url::parse(link)?;

        let key = match url.fragment() {
            Some(fragment) if !fragment.is_empty() => ShareKey::from_hex(fragment)?,
            _ => return Err(LinkError::MissingKey),
        };

        let segments: Vec<&str> = url
            .path_segments()
            .ok_or(LinkError::NotABase)?
            .filter(|s| !s.is_empty())
            .collect();
        let (id, prefix) = match segments.as_slice() {
            [prefix @ .., view, id] if *view == VIEW_SEGMENT => (*id, prefix.to_vec()),
            _ => return Err(LinkError::MissingId),
        };
        let id = id.parse::<SecretId>().map_err(|_| LinkError::InvalidId)?;

        let mut origin = bare(url.clone());
        origin.set_path(&prefix.join("/"));

        Ok(Self { origin, id, key })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn id(&self) -> &SecretId {
        &self.id
    }

    pub fn key(&self) -> &ShareKey {
        &self.key
    }

    /// Render the full link, key included
    pub fn to_url(&self) -> Result<Url, LinkError> {
        let mut url = append_path(&self.origin, &format!("{}/{}", VIEW_SEGMENT, self.id))?;
        url.set_fragment(Some(&self.key.to_hex()));
        Ok(url)
    }

    /// The URL a client fetches the ciphertext from: `{api_base}/api/secrets/{id}`.
    ///  Never contains the key.
    pub fn retrieve_url(&self, api_base: &Url) -> Result<Url, LinkError> {
        append_path(&bare(api_base.clone()), &format!("{}/{}", RETRIEVE_PATH, self.id))
    }
}

impl fmt::Display for ShareLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_url() {
            Ok(url) => write!(f, "{}", url),
            Err(_) => Err(fmt::Error),
        }
    }
}

/// Strip query and fragment
fn bare(mut url: Url) -> Url {
    url.set_query(None);
    url.set_fragment(None);
    url
}

fn append_path(base: &Url, tail: &str) -> Result<Url, LinkError> {
    if base.cannot_be_a_base() {
        return Err(LinkError::NotABase);
    }
    let mut url = base.clone();
    let path = format!("{}/{}", base.path().trim_end_matches('/'), tail);
    url.set_path(&path);
    Ok(url)
}
