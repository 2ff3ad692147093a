pub mod client;
pub mod commit;
pub mod credentials;
pub mod error;
pub mod oauth;
pub mod pkce;
pub mod resolve;
pub mod store;
pub mod types;

pub use client::{API_BASE, EPIC_SHOP_ID, ItadClient};
pub use commit::{SYNC_ACCOUNT_ID, SYNC_ACCOUNT_NAME, add_to_collection, link_profile, sync_category};
pub use credentials::{
    CredentialSource, CredentialSources, Credentials, DEFAULT_REDIRECT_URI, config_path,
    credential_sources, save_to_file,
};
pub use error::ApiError;
pub use oauth::{OAuthConfig, authorization_url, exchange_code, parse_callback};
pub use pkce::{Pkce, generate_state};
pub use resolve::{CatalogLookup, CatalogMatch, Resolution, resolve};
pub use store::SessionTokens;
pub use types::{
    CollectionGame, CollectionGroup, SearchResult, SyncGame, TokenResponse,
};
