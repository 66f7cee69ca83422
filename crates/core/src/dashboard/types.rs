//! Dashboard data types.

use chrono::NaiveDate;
use hogar_shared::types::{CardId, Currency, EventId, SavingsAccountId};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::balance::{BalanceService, BalanceSheet};
use crate::budget::{BudgetReport, BudgetStatus};
use crate::card::CardSummary;
use crate::month::MonthKey;
use crate::savings::SavingsSummary;
use crate::schedule::Reminder;
use crate::snapshot::MonthlySummary;

/// Upcoming family event.
#[derive(Debug, Clone, Serialize)]
pub struct EventBrief {
    /// Event ID.
    pub id: EventId,
    /// Title.
    pub title: String,
    /// Date.
    pub date: NaiveDate,
}

/// Card line on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct CardBrief {
    /// Card ID.
    pub id: CardId,
    /// Card name.
    pub name: String,
    /// Rolled-up balance.
    #[serde(flatten)]
    pub summary: CardSummary,
}

/// Savings account line on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct SavingsBrief {
    /// Account ID.
    pub id: SavingsAccountId,
    /// Account name.
    pub name: String,
    /// Balance and goal progress.
    #[serde(flatten)]
    pub summary: SavingsSummary,
}

/// Everything the dashboard loader fetched for a month.
#[derive(Debug, Clone)]
pub struct DashboardInputs {
    /// Month shown.
    pub month: MonthKey,
    /// Family display currency.
    pub currency: Currency,
    /// Expense and income totals.
    pub summary: MonthlySummary,
    /// Member balances for the month.
    pub balances: BalanceSheet,
    /// Budget usage for the month.
    pub budgets: BudgetReport,
    /// Bills due soon.
    pub reminders: Vec<Reminder>,
    /// Events still ahead this month.
    pub events: Vec<EventBrief>,
    /// The caller's cards.
    pub cards: Vec<CardBrief>,
    /// The caller's savings accounts.
    pub savings: Vec<SavingsBrief>,
}

/// Dashboard response.
#[derive(Debug, Clone, Serialize)]
pub struct HouseholdDashboard {
    /// Month shown.
    pub month: MonthKey,
    /// Currency the amounts are in.
    pub currency: Currency,
    /// Expense and income totals.
    pub summary: MonthlySummary,
    /// Member balances.
    pub balances: BalanceSheet,
    /// `"Luis owes Ana $50.00"`, or `None` when everyone is square.
    pub owes_text: Option<String>,
    /// Budget usage.
    pub budgets: BudgetReport,
    /// Categories in `Warning` or `Over`.
    pub budget_alerts: Vec<String>,
    /// Bills due soon.
    pub reminders: Vec<Reminder>,
    /// Upcoming events.
    pub events: Vec<EventBrief>,
    /// Cards.
    pub cards: Vec<CardBrief>,
    /// Sum of card balances.
    pub card_debt: Decimal,
    /// Savings accounts.
    pub savings: Vec<SavingsBrief>,
    /// Sum of savings balances.
    pub savings_total: Decimal,
}

impl From<DashboardInputs> for HouseholdDashboard {
    fn from(inputs: DashboardInputs) -> Self {
        let owes_text = BalanceService::who_owes_whom(&inputs.balances)
            .map(|debt| BalanceService::owes_text(&debt, inputs.currency));
        let budget_alerts = inputs
            .budgets
            .categories
            .iter()
            .filter(|usage| usage.status != BudgetStatus::Normal)
            .filter_map(|usage| usage.category.clone())
            .collect();
        let card_debt = inputs
            .cards
            .iter()
            .map(|card| card.summary.balance.max(Decimal::ZERO))
            .sum();
        let savings_total = inputs.savings.iter().map(|account| account.summary.balance).sum();

        Self {
            month: inputs.month,
            currency: inputs.currency,
            summary: inputs.summary,
            balances: inputs.balances,
            owes_text,
            budgets: inputs.budgets,
            budget_alerts,
            reminders: inputs.reminders,
            events: inputs.events,
            cards: inputs.cards,
            card_debt,
            savings: inputs.savings,
            savings_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::{ExpenseLine, Member, SharePolicy};
    use crate::budget::{BudgetService, CategoryBudget, CategorySpend};
    use crate::card::{CardMovementKind, CardMovementLine};
    use crate::savings::SavingsMovementKind;
    use crate::snapshot::SnapshotService;
    use crate::split::SplitMode;
    use hogar_shared::types::UserId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_dashboard_from_inputs() {
        let ana = Member::new(UserId::new(), "Ana");
        let luis = Member::new(UserId::new(), "Luis");
        let month = MonthKey::new(2026, 3).unwrap();

        let balances = BalanceService::compute(
            &[ExpenseLine {
                amount: dec!(100),
                paid_by: ana.user_id,
                split: SplitMode::EqualSplit,
            }],
            &[ana.clone(), luis],
            &[],
            SharePolicy::AllExpenses,
        );
        let budgets = BudgetService::report(
            &[
                CategoryBudget {
                    category: "super".into(),
                    amount: dec!(100),
                },
                CategoryBudget {
                    category: "luz".into(),
                    amount: dec!(100),
                },
            ],
            &[CategorySpend {
                category: "super".into(),
                amount: dec!(90),
            }],
        );
        let cards = vec![
            CardBrief {
                id: CardId::new(),
                name: "Visa".into(),
                summary: CardSummary::rollup(
                    dec!(0),
                    dec!(1000),
                    &[CardMovementLine {
                        kind: CardMovementKind::Cargo,
                        amount: dec!(200),
                    }],
                ),
            },
            CardBrief {
                id: CardId::new(),
                name: "Overpaid".into(),
                summary: CardSummary::rollup(
                    dec!(0),
                    dec!(500),
                    &[CardMovementLine {
                        kind: CardMovementKind::Pago,
                        amount: dec!(30),
                    }],
                ),
            },
        ];
        let savings = vec![SavingsBrief {
            id: SavingsAccountId::new(),
            name: "Viaje".into(),
            summary: SavingsSummary::rollup(None, &[(SavingsMovementKind::Deposit, dec!(250))]),
        }];

        let dashboard = HouseholdDashboard::from(DashboardInputs {
            month,
            currency: Currency::Eur,
            summary: SnapshotService::summarize(month, &[], &[]),
            balances,
            budgets,
            reminders: vec![],
            events: vec![],
            cards,
            savings,
        });

        assert_eq!(dashboard.owes_text.as_deref(), Some("Luis owes Ana €50.00"));
        assert_eq!(dashboard.budget_alerts, ["super"]);
        assert_eq!(dashboard.card_debt, dec!(200));
        assert_eq!(dashboard.savings_total, dec!(250));
    }
}
