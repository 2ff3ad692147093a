use serde::{Deserialize, Serialize};

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// One candidate from `games/search/v1`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub mature: bool,
}

/// One entry of `collection/games/v1`.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionGame {
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub added: Option<String>,
    #[serde(default)]
    pub groups: Vec<i64>,
}

/// A collection category from `collection/groups/v1`.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionGroup {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub public: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewGroup<'a> {
    pub title: &'a str,
    pub public: bool,
}

/// Body of `profiles/link/v1`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequest<'a> {
    pub account_id: &'a str,
    pub account_name: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkResponse {
    pub token: String,
}

/// One game in a `profiles/sync/collection/v1` submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncGame {
    pub shop: u32,
    pub id: String,
    pub title: String,
}
