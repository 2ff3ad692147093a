//! Writing confirmed matches to the user's ITAD account.
//!
//! Two modes, never mixed: additive collection import and declarative
//! category sync. Sync replaces the whole linked category.

use itad_import_core::{CommitOutcome, ResolvedMatch};

use crate::client::{EPIC_SHOP_ID, ItadClient};
use crate::error::ApiError;
use crate::types::SyncGame;

/// Account id the sync profile is linked under. Stable so relinking is idempotent.
pub const SYNC_ACCOUNT_ID: &str = "epicgameimporterjson2026";
pub const SYNC_ACCOUNT_NAME: &str = "Epic Games JSON Importer";

/// Add games to the collection. Ids already present are left alone.
pub async fn add_to_collection(
    client: &ItadClient,
    catalog_ids: &[String],
) -> Result<CommitOutcome, ApiError> {
    if catalog_ids.is_empty() {
        return Err(ApiError::NothingToCommit);
    }
    if !client.is_authenticated() {
        return Err(ApiError::Unauthenticated);
    }

    log::debug!("Adding {} games to the collection", catalog_ids.len());
    client.put_collection_games(catalog_ids).await?;
    Ok(CommitOutcome::Added {
        count: catalog_ids.len(),
    })
}

/// Link the importer's sync profile and return its token.
pub async fn link_profile(client: &ItadClient) -> Result<String, ApiError> {
    if !client.is_authenticated() {
        return Err(ApiError::Unauthenticated);
    }
    client
        .link_profile(SYNC_ACCOUNT_ID, SYNC_ACCOUNT_NAME)
        .await
}

/// Submit `entries` as the complete content of the linked category.
///
/// Games synced earlier but absent from `entries` are removed remotely.
pub async fn sync_category(
    client: &ItadClient,
    profile_token: Option<&str>,
    entries: &[ResolvedMatch],
) -> Result<CommitOutcome, ApiError> {
    if entries.is_empty() {
        return Err(ApiError::NothingToCommit);
    }
    if !client.is_authenticated() {
        return Err(ApiError::Unauthenticated);
    }
    let profile_token = profile_token
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::SyncNotLinked)?;

    let games = sync_games(entries);
    log::debug!("Syncing {} games to the linked category", games.len());
    let outcome = client
        .sync_profile_collection(profile_token, &games)
        .await?;
    Ok(CommitOutcome::Synced(outcome))
}

/// Sync payload: the storefront's own ids and titles under Epic's shop id.
pub fn sync_games(entries: &[ResolvedMatch]) -> Vec<SyncGame> {
    entries
        .iter()
        .map(|m| SyncGame {
            shop: EPIC_SHOP_ID,
            id: m.source_offer_id.clone(),
            title: m.source_title.clone(),
        })
        .collect()
}
