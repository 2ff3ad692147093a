use std::collections::HashMap;

use itad_import_core::SyncOutcome;
use serde::de::DeserializeOwned;

use crate::credentials::Credentials;
use crate::error::ApiError;
use crate::resolve::CatalogLookup;
use crate::types::{
    CollectionGame, CollectionGroup, LinkRequest, LinkResponse, NewGroup, SearchResult, SyncGame,
};

pub const API_BASE: &str = "https://api.isthereanydeal.com";

/// Epic Games Store's shop id in ITAD.
pub const EPIC_SHOP_ID: u32 = 16;

const USER_AGENT: &str = concat!("itad-import/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the IsThereAnyDeal API.
///
/// Catalog lookups authenticate with the API key; collection and profile
/// endpoints need the OAuth bearer token. Both are opaque here.
pub struct ItadClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    access_token: Option<String>,
}

pub(crate) fn http_client() -> Result<reqwest::Client, ApiError> {
    Ok(reqwest::Client::builder().user_agent(USER_AGENT).build()?)
}

impl ItadClient {
    pub fn new() -> Result<Self, ApiError> {
        Ok(Self {
            http: http_client()?,
            base_url: API_BASE.to_string(),
            api_key: None,
            access_token: None,
        })
    }

    /// Client configured from loaded credentials and an optional bearer token.
    pub fn from_credentials(
        creds: &Credentials,
        access_token: Option<String>,
    ) -> Result<Self, ApiError> {
        Ok(Self::new()?
            .with_api_key(creds.api_key.clone())
            .with_access_token(access_token))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_access_token(mut self, access_token: Option<String>) -> Self {
        self.access_token = access_token;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Exact lookup by storefront offer id. Returns offer id -> game id.
    pub async fn lookup_shop_ids(
        &self,
        shop_id: u32,
        offer_ids: &[String],
    ) -> Result<HashMap<String, Option<String>>, ApiError> {
        let key = self.api_key()?;
        log::debug!("Looking up {} offer ids in shop {}", offer_ids.len(), shop_id);

        let resp = self
            .http
            .post(self.url(&format!("/lookup/id/shop/{}/v1", shop_id)))
            .query(&[("key", key)])
            .json(offer_ids)
            .send()
            .await?;

        read_json(check(resp).await?).await
    }

    /// Title lookup. Returns title -> game id; the service picks the match.
    pub async fn lookup_title_ids(
        &self,
        titles: &[String],
    ) -> Result<HashMap<String, Option<String>>, ApiError> {
        let key = self.api_key()?;
        log::debug!("Looking up {} titles", titles.len());

        let resp = self
            .http
            .post(self.url("/lookup/id/title/v1"))
            .query(&[("key", key)])
            .json(titles)
            .send()
            .await?;

        read_json(check(resp).await?).await
    }

    /// Search the catalog by title.
    pub async fn search_games(
        &self,
        title: &str,
        results: usize,
    ) -> Result<Vec<SearchResult>, ApiError> {
        let key = self.api_key()?;
        let results = results.to_string();
        let resp = self
            .http
            .get(self.url("/games/search/v1"))
            .query(&[("key", key), ("title", title), ("results", results.as_str())])
            .send()
            .await?;

        read_json(check(resp).await?).await
    }

    pub async fn list_collection(&self) -> Result<Vec<CollectionGame>, ApiError> {
        let resp = self
            .http
            .get(self.url("/collection/games/v1"))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;

        read_json(check(resp).await?).await
    }

    /// Add games to the collection. The endpoint answers 204 on success and
    /// ignores ids that are already present.
    pub async fn put_collection_games(&self, game_ids: &[String]) -> Result<(), ApiError> {
        let resp = self
            .http
            .put(self.url("/collection/games/v1"))
            .bearer_auth(self.bearer()?)
            .json(game_ids)
            .send()
            .await?;

        check(resp).await?;
        Ok(())
    }

    pub async fn list_groups(&self) -> Result<Vec<CollectionGroup>, ApiError> {
        let resp = self
            .http
            .get(self.url("/collection/groups/v1"))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;

        read_json(check(resp).await?).await
    }

    pub async fn create_group(&self, title: &str, public: bool) -> Result<CollectionGroup, ApiError> {
        let resp = self
            .http
            .post(self.url("/collection/groups/v1"))
            .bearer_auth(self.bearer()?)
            .json(&NewGroup { title, public })
            .send()
            .await?;

        read_json(check(resp).await?).await
    }

    /// Link a sync profile. Idempotent for the same account id; returns the
    /// profile token sync calls must carry.
    pub async fn link_profile(
        &self,
        account_id: &str,
        account_name: &str,
    ) -> Result<String, ApiError> {
        let resp = self
            .http
            .put(self.url("/profiles/link/v1"))
            .bearer_auth(self.bearer()?)
            .json(&LinkRequest {
                account_id,
                account_name,
            })
            .send()
            .await?;

        let link: LinkResponse = read_json(check(resp).await?).await?;
        Ok(link.token)
    }

    /// Replace the contents of the linked profile's category with `games`.
    pub async fn sync_profile_collection(
        &self,
        profile_token: &str,
        games: &[SyncGame],
    ) -> Result<SyncOutcome, ApiError> {
        let resp = self
            .http
            .put(self.url("/profiles/sync/collection/v1"))
            .bearer_auth(self.bearer()?)
            .header("ITAD-Profile", profile_token)
            .json(games)
            .send()
            .await?;

        read_json(check(resp).await?).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn api_key(&self) -> Result<&str, ApiError> {
        self.api_key.as_deref().ok_or_else(|| {
            ApiError::Config(
                "Missing api_key. Set ITAD_API_KEY or run 'itad-import config setup'".to_string(),
            )
        })
    }

    fn bearer(&self) -> Result<&str, ApiError> {
        self.access_token
            .as_deref()
            .ok_or(ApiError::Unauthenticated)
    }
}

impl CatalogLookup for ItadClient {
    async fn lookup_offer_ids(
        &self,
        offer_ids: &[String],
    ) -> Result<HashMap<String, Option<String>>, ApiError> {
        self.lookup_shop_ids(EPIC_SHOP_ID, offer_ids).await
    }

    async fn lookup_titles(
        &self,
        titles: &[String],
    ) -> Result<HashMap<String, Option<String>>, ApiError> {
        self.lookup_title_ids(titles).await
    }
}

/// Turn any non-2xx response into [`ApiError::Upstream`] carrying the body.
pub(crate) async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    log::debug!("ITAD request failed: {} {}", status, body);
    Err(ApiError::Upstream {
        status: status.as_u16(),
        body,
    })
}

pub(crate) async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        log::debug!(
            "Unparseable response: {}",
            &text[..floor_char_boundary(&text, 200)]
        );
        ApiError::from(e)
    })
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}
