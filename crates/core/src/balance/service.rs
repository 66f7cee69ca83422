//! Balance computation.

use std::collections::HashMap;

use hogar_shared::types::{CENT, Currency, UserId, format_in, round_cents};
use rust_decimal::Decimal;

use super::types::{
    BalanceSheet, Debt, ExpenseLine, Member, MemberBalance, SettlementLine, SharePolicy,
};
use crate::split::SplitMode;

/// Balance service for business logic.
pub struct BalanceService;

impl BalanceService {
    /// Computes every member's paid total and net balance.
    ///
    /// 1. `total` is the sum of pooled expenses.
    /// 2. `equal_share = total / member_count` (zero without members).
    /// 3. `balance = paid - equal_share`.
    /// 4. Each settlement moves `amount` from `to_user` to `from_user`.
    ///
    /// Expenses paid by someone who is not a listed member are left out of
    /// the pool. Settlements and `para_otro` transfers are only applied when
    /// both sides are listed members, so the balances keep summing to zero.
    #[must_use]
    pub fn compute(
        expenses: &[ExpenseLine],
        members: &[Member],
        settlements: &[SettlementLine],
        policy: SharePolicy,
    ) -> BalanceSheet {
        let is_member = |id: UserId| members.iter().any(|m| m.user_id == id);

        let mut total = Decimal::ZERO;
        let mut paid: HashMap<UserId, Decimal> = HashMap::new();
        let mut adjustments: HashMap<UserId, Decimal> = HashMap::new();

        for expense in expenses {
            if !is_member(expense.paid_by) {
                continue;
            }
            match (policy, expense.split) {
                (SharePolicy::AllExpenses, _)
                | (SharePolicy::BySplitMode, SplitMode::EqualSplit) => {
                    total += expense.amount;
                    *paid.entry(expense.paid_by).or_default() += expense.amount;
                }
                (SharePolicy::BySplitMode, SplitMode::Personal) => {}
                (SharePolicy::BySplitMode, SplitMode::ForMember(beneficiary)) => {
                    if is_member(beneficiary) {
                        *adjustments.entry(expense.paid_by).or_default() += expense.amount;
                        *adjustments.entry(beneficiary).or_default() -= expense.amount;
                    }
                }
            }
        }

        let equal_share = if members.is_empty() {
            Decimal::ZERO
        } else {
            total / Decimal::from(members.len())
        };

        for settlement in settlements {
            if settlement.from_user == settlement.to_user
                || !is_member(settlement.from_user)
                || !is_member(settlement.to_user)
            {
                continue;
            }
            *adjustments.entry(settlement.from_user).or_default() += settlement.amount;
            *adjustments.entry(settlement.to_user).or_default() -= settlement.amount;
        }

        let members = members
            .iter()
            .map(|member| {
                let paid = paid.get(&member.user_id).copied().unwrap_or_default();
                let adjustment = adjustments
                    .get(&member.user_id)
                    .copied()
                    .unwrap_or_default();
                MemberBalance {
                    user_id: member.user_id,
                    name: member.name.clone(),
                    paid,
                    balance: paid - equal_share + adjustment,
                }
            })
            .collect();

        BalanceSheet {
            policy,
            total,
            equal_share,
            members,
        }
    }

    /// Picks the lowest balance as debtor and the highest as creditor.
    ///
    /// With three or more members only this one pair is reported; it is
    /// not a minimal set of transfers. Returns `None` when fewer than two
    /// members are listed or the debt is below one cent.
    #[must_use]
    pub fn who_owes_whom(sheet: &BalanceSheet) -> Option<Debt> {
        if sheet.members.len() < 2 {
            return None;
        }

        let mut ordered: Vec<&MemberBalance> = sheet.members.iter().collect();
        ordered.sort_by(|a, b| a.balance.cmp(&b.balance));

        let debtor = ordered.first()?;
        let creditor = ordered.last()?;
        let amount = debtor.balance.abs();

        if debtor.user_id == creditor.user_id || amount < CENT {
            return None;
        }

        Some(Debt {
            debtor: Member::new(debtor.user_id, debtor.name.clone()),
            creditor: Member::new(creditor.user_id, creditor.name.clone()),
            amount: round_cents(amount),
        })
    }

    /// Renders a debt in the family's currency, e.g. `"Luis owes Ana $50.00"`.
    #[must_use]
    pub fn owes_text(debt: &Debt, currency: Currency) -> String {
        format!(
            "{} owes {} {}",
            debt.debtor.name,
            debt.creditor.name,
            format_in(debt.amount, currency)
        )
    }
}
