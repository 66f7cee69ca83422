//! HTTP error responses.
//!
//! Handlers return [`ApiResult`]. Every repository and domain error converts
//! into an [`AppError`] here, so handlers can use `?` and the status code and
//! `error` code stay consistent across routes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hogar_core::auth::PasswordError;
use hogar_core::balance::BalanceError;
use hogar_core::budget::BudgetError;
use hogar_core::card::CardError;
use hogar_core::family::FamilyError;
use hogar_core::inventory::InventoryError;
use hogar_core::receipt::ReceiptError;
use hogar_core::savings::SavingsError;
use hogar_core::schedule::ScheduleError;
use hogar_core::snapshot::SnapshotError;
use hogar_core::split::SplitError;
use hogar_core::storage::StorageError;
use hogar_core::validation::ValidationError;
use hogar_db::repositories::{
    BalanceRepoError, BudgetRepoError, CardRepoError, DashboardRepoError, EventRepoError,
    ExpenseRepoError, FamilyRepoError, FixedExpenseRepoError, IncomeRepoError, InventoryRepoError,
    SavingsRepoError, SettlementRepoError, ShoppingRepoError, SnapshotRepoError,
};
use hogar_shared::{AppError, JwtError};
use sea_orm::DbErr;
use serde_json::json;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An [`AppError`] on its way to becoming an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// The wrapped application error.
    #[must_use]
    pub const fn inner(&self) -> &AppError {
        &self.0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_server_error() {
            tracing::error!(error = %err, "Request failed");
        }

        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(json!({
                "error": err.error_code(),
                "message": err.public_message(),
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self(errors.into())
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        Self(match err {
            JwtError::Expired => AppError::Unauthorized("Token has expired".into()),
            JwtError::DecodingError(_) | JwtError::WrongKind => {
                AppError::Unauthorized("Invalid or malformed token".into())
            }
            JwtError::EncodingError(e) => AppError::Internal(e),
        })
    }
}

// ============================================================================
// Domain errors
// ============================================================================

macro_rules! validation_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ApiError {
                fn from(err: $ty) -> Self {
                    Self(AppError::Validation(err.to_string()))
                }
            }
        )+
    };
}

validation_error!(ValidationError, SplitError, BalanceError, ScheduleError, CardError);

impl From<FamilyError> for ApiError {
    fn from(err: FamilyError) -> Self {
        Self(match err {
            FamilyError::InvalidInviteCode => AppError::Validation(err.to_string()),
            FamilyError::AlreadyInFamily => AppError::Conflict(err.to_string()),
            FamilyError::Forbidden(message) => AppError::Forbidden(message.to_string()),
            FamilyError::UnknownRole(_) => AppError::Internal(err.to_string()),
        })
    }
}

impl From<BudgetError> for ApiError {
    fn from(err: BudgetError) -> Self {
        Self(match err {
            BudgetError::DuplicateCategory(_) => AppError::Conflict(err.to_string()),
            BudgetError::EmptyCategory | BudgetError::NegativeAmount(_) => {
                AppError::Validation(err.to_string())
            }
        })
    }
}

impl From<SavingsError> for ApiError {
    fn from(err: SavingsError) -> Self {
        Self(match err {
            SavingsError::InsufficientFunds { .. } => AppError::BusinessRule(err.to_string()),
            SavingsError::UnknownKind(_)
            | SavingsError::NonPositiveAmount
            | SavingsError::NegativeGoal => AppError::Validation(err.to_string()),
        })
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        Self(match err {
            InventoryError::StockOverflow => AppError::BusinessRule(err.to_string()),
            InventoryError::NonPositiveQuantity(_)
            | InventoryError::NegativePrice
            | InventoryError::UnknownKind(_) => AppError::Validation(err.to_string()),
        })
    }
}

impl From<SnapshotError> for ApiError {
    fn from(err: SnapshotError) -> Self {
        Self(match err {
            SnapshotError::AlreadyClosed(_) => AppError::Conflict(err.to_string()),
            SnapshotError::FutureMonth(_) => AppError::BusinessRule(err.to_string()),
        })
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self(match err {
            PasswordError::TooShort => AppError::Validation(err.to_string()),
            PasswordError::HashError(_)
            | PasswordError::VerifyError(_)
            | PasswordError::InvalidHash => AppError::Internal(err.to_string()),
        })
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self(match err {
            StorageError::FileTooLarge { .. }
            | StorageError::InvalidMimeType(_)
            | StorageError::EmptyFile => AppError::Validation(err.to_string()),
            StorageError::NotFound(_) => AppError::NotFound(err.to_string()),
            StorageError::PresignNotSupported => AppError::BusinessRule(err.to_string()),
            StorageError::Configuration(_) | StorageError::Operation(_) => {
                AppError::ExternalService(err.to_string())
            }
        })
    }
}

impl From<ReceiptError> for ApiError {
    fn from(err: ReceiptError) -> Self {
        match err {
            ReceiptError::Storage(e) => e.into(),
            ReceiptError::NotFound(_) | ReceiptError::TargetNotFound(_) => {
                Self(AppError::NotFound(err.to_string()))
            }
            ReceiptError::UploadNotVerified => Self(AppError::BusinessRule(err.to_string())),
            ReceiptError::FileSizeMismatch { .. } => Self(AppError::Validation(err.to_string())),
            ReceiptError::Repository(e) => Self(AppError::Database(e)),
        }
    }
}

// ============================================================================
// Repository errors
// ============================================================================

/// Repositories whose only failures are a missing row or the database.
macro_rules! not_found_or_database {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl From<$ty> for ApiError {
                fn from(err: $ty) -> Self {
                    match err {
                        $ty::Database(e) => e.into(),
                        $ty::NotFound(_) => Self(AppError::NotFound(err.to_string())),
                    }
                }
            }
        )+
    };
}

not_found_or_database!(
    IncomeRepoError,
    SettlementRepoError,
    BudgetRepoError,
    ShoppingRepoError,
    EventRepoError
);

impl From<FamilyRepoError> for ApiError {
    fn from(err: FamilyRepoError) -> Self {
        match err {
            FamilyRepoError::Database(e) => e.into(),
            FamilyRepoError::NotFound(_) | FamilyRepoError::InviteCodeNotFound => {
                Self(AppError::NotFound(err.to_string()))
            }
            FamilyRepoError::AlreadyInFamily | FamilyRepoError::InviteCodeTaken => {
                Self(AppError::Conflict(err.to_string()))
            }
            FamilyRepoError::UnknownCurrency(_) => Self(AppError::Internal(err.to_string())),
        }
    }
}

impl From<ExpenseRepoError> for ApiError {
    fn from(err: ExpenseRepoError) -> Self {
        match err {
            ExpenseRepoError::Database(e) => e.into(),
            ExpenseRepoError::NotFound(_) => Self(AppError::NotFound(err.to_string())),
            ExpenseRepoError::InvalidSplit(e) => Self(AppError::Internal(e.to_string())),
        }
    }
}

impl From<BalanceRepoError> for ApiError {
    fn from(err: BalanceRepoError) -> Self {
        match err {
            BalanceRepoError::Database(e) => e.into(),
            BalanceRepoError::InvalidSplit(e) => Self(AppError::Internal(e.to_string())),
        }
    }
}

impl From<FixedExpenseRepoError> for ApiError {
    fn from(err: FixedExpenseRepoError) -> Self {
        match err {
            FixedExpenseRepoError::Database(e) => e.into(),
            FixedExpenseRepoError::NotFound(_) | FixedExpenseRepoError::NotPaid(_) => {
                Self(AppError::NotFound(err.to_string()))
            }
            FixedExpenseRepoError::AlreadyPaid(_) => Self(AppError::Conflict(err.to_string())),
            FixedExpenseRepoError::InvalidDueDay(_) => Self(AppError::Validation(err.to_string())),
        }
    }
}

impl From<CardRepoError> for ApiError {
    fn from(err: CardRepoError) -> Self {
        match err {
            CardRepoError::Database(e) => e.into(),
            CardRepoError::NotFound(_) | CardRepoError::MovementNotFound(_) => {
                Self(AppError::NotFound(err.to_string()))
            }
        }
    }
}

impl From<SavingsRepoError> for ApiError {
    fn from(err: SavingsRepoError) -> Self {
        match err {
            SavingsRepoError::Database(e) => e.into(),
            SavingsRepoError::Rejected(e) => e.into(),
            SavingsRepoError::NotFound(_) | SavingsRepoError::MovementNotFound(_) => {
                Self(AppError::NotFound(err.to_string()))
            }
        }
    }
}

impl From<InventoryRepoError> for ApiError {
    fn from(err: InventoryRepoError) -> Self {
        match err {
            InventoryRepoError::Database(e) => e.into(),
            InventoryRepoError::Stock(e) => e.into(),
            InventoryRepoError::ProductNotFound(_) | InventoryRepoError::TransactionNotFound(_) => {
                Self(AppError::NotFound(err.to_string()))
            }
            InventoryRepoError::DuplicateSku(_) | InventoryRepoError::ProductInUse => {
                Self(AppError::Conflict(err.to_string()))
            }
        }
    }
}

impl From<SnapshotRepoError> for ApiError {
    fn from(err: SnapshotRepoError) -> Self {
        match err {
            SnapshotRepoError::Database(e) => e.into(),
            SnapshotRepoError::Rejected(e) => e.into(),
            SnapshotRepoError::Summary(e) => Self(AppError::Internal(e.to_string())),
        }
    }
}

impl From<DashboardRepoError> for ApiError {
    fn from(err: DashboardRepoError) -> Self {
        match err {
            DashboardRepoError::Database(e) => e.into(),
            DashboardRepoError::Balance(e) => e.into(),
            DashboardRepoError::Snapshot(e) => e.into(),
            DashboardRepoError::Family(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hogar_core::month::MonthKey;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn status(err: impl Into<ApiError>) -> u16 {
        err.into().inner().status_code()
    }

    #[rstest]
    #[case(ApiError::from(ValidationError::NonPositiveAmount), 400)]
    #[case(ApiError::from(FamilyError::Forbidden("only the payer can delete this expense")), 403)]
    #[case(ApiError::from(FamilyError::AlreadyInFamily), 409)]
    #[case(ApiError::from(SnapshotError::AlreadyClosed(MonthKey::new(2026, 3).unwrap())), 409)]
    #[case(ApiError::from(SnapshotError::FutureMonth(MonthKey::new(2030, 1).unwrap())), 422)]
    #[case(
        ApiError::from(FixedExpenseRepoError::AlreadyPaid(MonthKey::new(2026, 3).unwrap())),
        409
    )]
    #[case(ApiError::from(InventoryRepoError::ProductInUse), 409)]
    #[case(ApiError::from(DbErr::Custom("boom".into())), 500)]
    fn test_error_status(#[case] err: ApiError, #[case] expected: u16) {
        assert_eq!(err.inner().status_code(), expected);
    }

    #[test]
    fn test_insufficient_funds_is_business_rule() {
        let err = SavingsRepoError::Rejected(SavingsError::InsufficientFunds {
            balance: dec!(100),
            requested: dec!(150),
        });
        assert_eq!(status(err), 422);
    }

    #[test]
    fn test_receipt_storage_error_unwraps() {
        let err = ReceiptError::Storage(StorageError::InvalidMimeType("text/html".into()));
        assert_eq!(status(err), 400);
    }

    #[test]
    fn test_forbidden_message_is_public() {
        let err = ApiError::from(FamilyError::Forbidden(
            "only the receiver can delete this income",
        ));
        assert_eq!(
            err.inner().public_message(),
            "only the receiver can delete this income"
        );
    }
}
