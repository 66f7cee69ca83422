//! Dashboard loader.
//!
//! Gathers everything the household dashboard shows for one month. The
//! queries are independent, so they run concurrently.

use chrono::NaiveDate;
use hogar_core::balance::SharePolicy;
use hogar_core::dashboard::{DashboardInputs, HouseholdDashboard};
use hogar_core::month::MonthKey;
use hogar_shared::types::{FamilyId, UserId};
use sea_orm::{DatabaseConnection, DbErr};

use super::balance::{BalanceRepoError, BalanceRepository};
use super::budget::BudgetRepository;
use super::card::CardRepository;
use super::event::EventRepository;
use super::family::{FamilyRepoError, FamilyRepository};
use super::fixed_expense::FixedExpenseRepository;
use super::savings::SavingsRepository;
use super::snapshot::{SnapshotRepoError, SnapshotRepository};

/// Bills due within this many days show up as reminders.
pub const REMINDER_WINDOW_DAYS: u32 = 7;

/// Error types for dashboard loading.
#[derive(Debug, thiserror::Error)]
pub enum DashboardRepoError {
    /// Balance sheet could not be computed.
    #[error(transparent)]
    Balance(#[from] BalanceRepoError),

    /// Family could not be loaded.
    #[error(transparent)]
    Family(#[from] FamilyRepoError),

    /// Month summary could not be loaded.
    #[error(transparent)]
    Snapshot(#[from] SnapshotRepoError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

type Step<T> = Result<T, DashboardRepoError>;

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    balances: BalanceRepository,
    budgets: BudgetRepository,
    cards: CardRepository,
    events: EventRepository,
    families: FamilyRepository,
    fixed: FixedExpenseRepository,
    savings: SavingsRepository,
    snapshots: SnapshotRepository,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            balances: BalanceRepository::new(db.clone()),
            budgets: BudgetRepository::new(db.clone()),
            cards: CardRepository::new(db.clone()),
            events: EventRepository::new(db.clone()),
            families: FamilyRepository::new(db.clone()),
            fixed: FixedExpenseRepository::new(db.clone()),
            savings: SavingsRepository::new(db.clone()),
            snapshots: SnapshotRepository::new(db),
        }
    }

    /// Loads the dashboard of `month` as seen by `viewer`.
    ///
    /// Cards and savings accounts are personal, so only the viewer's are
    /// included. Reminders and upcoming events are relative to `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn load(
        &self,
        family_id: FamilyId,
        viewer: UserId,
        month: MonthKey,
        today: NaiveDate,
    ) -> Result<HouseholdDashboard, DashboardRepoError> {
        let (currency, summary, balances, budgets, reminders, events, cards, savings) =
            tokio::try_join!(
                async { Step::Ok(self.families.currency(family_id).await?) },
                async { Step::Ok(self.snapshots.summary_for(family_id, month).await?) },
                async {
                    Step::Ok(
                        self.balances
                            .sheet(family_id, month, SharePolicy::AllExpenses)
                            .await?,
                    )
                },
                async { Step::Ok(self.budgets.usage(family_id, month).await?) },
                async {
                    Step::Ok(
                        self.fixed
                            .reminders(family_id, today, REMINDER_WINDOW_DAYS)
                            .await?,
                    )
                },
                async { Step::Ok(self.events.upcoming(family_id, today).await?) },
                async { Step::Ok(self.cards.briefs_for_owner(family_id, viewer).await?) },
                async { Step::Ok(self.savings.briefs_for_owner(family_id, viewer).await?) },
            )?;

        tracing::debug!(
            family_id = %family_id,
            month = %month,
            reminders = reminders.len(),
            events = events.len(),
            "dashboard loaded"
        );

        Ok(HouseholdDashboard::from(DashboardInputs {
            month,
            currency,
            summary,
            balances,
            budgets,
            reminders,
            events,
            cards,
            savings,
        }))
    }
}
