//! Request extractors shared by the family routes.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use chrono::{NaiveDate, Utc};
use hogar_core::family::{Actor, FamilyRole};
use hogar_core::month::MonthKey;
use hogar_db::FamilyRepository;
use hogar_shared::AppError;
use hogar_shared::types::FamilyId;
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// The caller, verified to belong to the family in the `{family_id}` path
/// segment.
///
/// Every family route extracts this before touching family data, so a
/// token from one family can never read another family's rows.
#[derive(Debug, Clone, Copy)]
pub struct FamilyMember {
    /// Family from the path.
    pub family_id: FamilyId,
    /// The caller and their role.
    pub actor: Actor,
}

impl FamilyMember {
    /// The calling user.
    #[must_use]
    pub const fn user_id(&self) -> hogar_shared::types::UserId {
        self.actor.user_id
    }
}

impl FromRequestParts<AppState> for FamilyMember {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;

        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError(AppError::Validation(e.body_text())))?;
        let family_id: FamilyId = params
            .get("family_id")
            .ok_or_else(|| ApiError(AppError::Internal("route has no family_id segment".into())))?
            .parse()
            .map_err(|_| ApiError(AppError::Validation("family_id must be a UUID".into())))?;

        let membership = FamilyRepository::new((*state.db).clone())
            .membership(family_id, auth.user_id())
            .await?;
        let Some(membership) = membership else {
            tracing::info!(
                family_id = %family_id,
                user_id = %auth.user_id(),
                "Rejected request from non-member"
            );
            return Err(ApiError(AppError::Forbidden(
                "You are not a member of this family".into(),
            )));
        };

        Ok(Self {
            family_id,
            actor: Actor::new(auth.user_id(), FamilyRole::from(membership.role)),
        })
    }
}

/// `?month=YYYY-MM`, defaulting to the current month.
#[derive(Debug, Clone, Copy)]
pub struct MonthParam(pub MonthKey);

#[derive(Debug, Deserialize)]
struct MonthQuery {
    month: Option<String>,
}

impl MonthParam {
    /// Parses an optional `YYYY-MM` string.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the string is not a month key.
    pub fn parse(raw: Option<&str>) -> Result<Self, ApiError> {
        match raw {
            None => Ok(Self(MonthKey::of(today()))),
            Some(raw) => raw.parse().map(Self).map_err(|_| {
                ApiError(AppError::Validation(format!(
                    "month must be YYYY-MM, got '{raw}'"
                )))
            }),
        }
    }
}

impl<S> FromRequestParts<S> for MonthParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<MonthQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError(AppError::Validation(e.body_text())))?;
        Self::parse(query.month.as_deref())
    }
}

/// Today's date in UTC.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_param_parses_key() {
        let MonthParam(month) = MonthParam::parse(Some("2026-03")).unwrap();
        assert_eq!(month, MonthKey::new(2026, 3).unwrap());
    }

    #[test]
    fn test_month_param_defaults_to_current() {
        let MonthParam(month) = MonthParam::parse(None).unwrap();
        assert_eq!(month, MonthKey::of(today()));
    }

    #[test]
    fn test_month_param_rejects_garbage() {
        let err = MonthParam::parse(Some("marzo")).unwrap_err();
        assert_eq!(err.inner().status_code(), 400);
    }
}
