//! Helpers shared by the family data routes.

use hogar_core::split::{SplitMode, TAG_EQUAL_SPLIT};
use hogar_core::storage::StorageService;
use hogar_db::FamilyRepository;
use hogar_shared::AppError;
use hogar_shared::types::{FamilyId, UserId};
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;

/// Parses the split tag and member of a request body.
///
/// A missing tag means `50/50`.
pub(crate) fn split_mode(tag: Option<&str>, for_member: Option<Uuid>) -> ApiResult<SplitMode> {
    Ok(SplitMode::from_parts(
        tag.unwrap_or(TAG_EQUAL_SPLIT),
        for_member.map(UserId::from_uuid),
    )?)
}

/// Ids of the family's members.
pub(crate) async fn member_ids(state: &AppState, family_id: FamilyId) -> ApiResult<Vec<UserId>> {
    Ok(FamilyRepository::new((*state.db).clone())
        .member_ids(family_id)
        .await?)
}

/// Trims optional free text, dropping it when blank.
pub(crate) fn clean_text(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Trims a required name.
pub(crate) fn required_text(field: &str, text: &str) -> ApiResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")).into());
    }
    Ok(text.to_string())
}

/// The configured receipt storage.
pub(crate) fn storage(state: &AppState) -> ApiResult<Arc<StorageService>> {
    state
        .storage
        .clone()
        .ok_or_else(|| AppError::ExternalService("Receipt storage is not configured".into()).into())
}

/// Deletes receipt blobs left behind by a deleted row.
///
/// The rows are already gone; a failed blob delete is only logged.
pub(crate) async fn remove_blobs(state: &AppState, keys: Vec<String>) {
    let Some(storage) = state.storage.as_ref() else {
        if !keys.is_empty() {
            tracing::warn!(count = keys.len(), "Receipt rows removed without storage configured");
        }
        return;
    };
    for key in keys {
        if let Err(e) = storage.delete(&key).await {
            tracing::warn!(storage_key = %key, error = %e, "Failed to delete receipt blob");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_mode_defaults_to_equal() {
        assert_eq!(split_mode(None, None).unwrap(), SplitMode::EqualSplit);
    }

    #[test]
    fn test_split_mode_for_member() {
        let luis = Uuid::now_v7();
        assert_eq!(
            split_mode(Some("para_otro"), Some(luis)).unwrap(),
            SplitMode::ForMember(UserId::from_uuid(luis))
        );
        assert!(split_mode(Some("para_otro"), None).is_err());
        assert!(split_mode(Some("personal"), Some(luis)).is_err());
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text(Some("  luz  ".into())).as_deref(), Some("luz"));
        assert_eq!(clean_text(Some("   ".into())), None);
        assert_eq!(clean_text(None), None);
    }
}
