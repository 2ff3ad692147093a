//! Authorization-code flow with PKCE against IsThereAnyDeal.

use reqwest::Url;

use crate::client::{check, http_client, read_json};
use crate::error::ApiError;
use crate::pkce::CHALLENGE_METHOD;
use crate::types::TokenResponse;

pub const AUTHORIZE_URL: &str = "https://isthereanydeal.com/oauth/authorize/";
pub const TOKEN_URL: &str = "https://isthereanydeal.com/oauth/token/";

/// Scopes needed to read and write the collection.
pub const SCOPES: &str = "coll_read coll_write";

/// OAuth app registration plus the endpoints to talk to.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub authorize_url: String,
    pub token_url: String,
}

impl OAuthConfig {
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            authorize_url: AUTHORIZE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
        }
    }

    pub fn with_endpoints(
        mut self,
        authorize_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        self.authorize_url = authorize_url.into();
        self.token_url = token_url.into();
        self
    }
}

/// URL the user opens to grant access.
pub fn authorization_url(
    config: &OAuthConfig,
    state: &str,
    challenge: &str,
) -> Result<String, ApiError> {
    let url = Url::parse_with_params(
        &config.authorize_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", SCOPES),
            ("state", state),
            ("code_challenge", challenge),
            ("code_challenge_method", CHALLENGE_METHOD),
        ],
    )
    .map_err(|e| ApiError::OAuth(format!("Invalid authorize URL: {}", e)))?;

    Ok(url.into())
}

/// Extract the authorization code from the redirect.
///
/// Accepts the full redirected URL or just its query string. The `state`
/// parameter must match the one sent with the authorization request.
pub fn parse_callback(url_or_query: &str, expected_state: &str) -> Result<String, ApiError> {
    let input = url_or_query.trim();
    let url = if input.contains("://") {
        Url::parse(input)
    } else {
        Url::parse(&format!("http://localhost/?{}", input.trim_start_matches('?')))
    }
    .map_err(|e| ApiError::OAuth(format!("Could not parse callback URL: {}", e)))?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    let mut description = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "error_description" => description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(ApiError::OAuth(description.unwrap_or(error)));
    }

    match state {
        None => return Err(ApiError::OAuth("Missing state in callback".to_string())),
        Some(s) if s != expected_state => {
            return Err(ApiError::OAuth(
                "State mismatch; the callback does not belong to this login".to_string(),
            ));
        }
        Some(_) => {}
    }

    code.filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::OAuth("Missing authorization code in callback".to_string()))
}

/// Trade the authorization code for an access token.
pub async fn exchange_code(
    config: &OAuthConfig,
    code: &str,
    verifier: &str,
) -> Result<TokenResponse, ApiError> {
    log::debug!("Exchanging authorization code at {}", config.token_url);

    let resp = http_client()?
        .post(&config.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("code_verifier", verifier),
        ])
        .send()
        .await?;

    read_json(check(resp).await?).await
}
