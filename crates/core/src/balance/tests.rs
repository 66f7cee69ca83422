//! Balance computation tests.

use hogar_shared::types::{Currency, UserId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::BalanceService;
use super::types::{ExpenseLine, Member, SettlementLine, SharePolicy};
use crate::split::SplitMode;

/// Decimal division keeps 28 significant digits, so an equal share of a
/// total that does not divide evenly leaves a remainder far below a cent.
const ZERO_SUM_TOLERANCE: Decimal = dec!(0.000000000001);

fn ana_and_luis() -> (Member, Member) {
    (Member::new(UserId::new(), "Ana"), Member::new(UserId::new(), "Luis"))
}

fn expense(amount: Decimal, paid_by: &Member, split: SplitMode) -> ExpenseLine {
    ExpenseLine {
        amount,
        paid_by: paid_by.user_id,
        split,
    }
}

#[test]
fn test_ana_pays_hundred() {
    let (ana, luis) = ana_and_luis();
    let members = vec![ana.clone(), luis.clone()];
    let expenses = vec![expense(dec!(100), &ana, SplitMode::EqualSplit)];

    let sheet = BalanceService::compute(&expenses, &members, &[], SharePolicy::AllExpenses);

    assert_eq!(sheet.total, dec!(100));
    assert_eq!(sheet.equal_share, dec!(50));
    assert_eq!(sheet.member(ana.user_id).unwrap().balance, dec!(50));
    assert_eq!(sheet.member(luis.user_id).unwrap().balance, dec!(-50));

    let debt = BalanceService::who_owes_whom(&sheet).unwrap();
    assert_eq!(debt.debtor, luis);
    assert_eq!(debt.creditor, ana);
    assert_eq!(
        BalanceService::owes_text(&debt, Currency::Mxn),
        "Luis owes Ana $50.00"
    );
}

#[test]
fn test_owes_text_uses_family_currency() {
    let (ana, luis) = ana_and_luis();
    let members = vec![ana.clone(), luis];
    let expenses = vec![expense(dec!(100), &ana, SplitMode::EqualSplit)];

    let sheet = BalanceService::compute(&expenses, &members, &[], SharePolicy::AllExpenses);
    let debt = BalanceService::who_owes_whom(&sheet).unwrap();

    assert_eq!(
        BalanceService::owes_text(&debt, Currency::Eur),
        "Luis owes Ana €50.00"
    );
    assert_eq!(
        BalanceService::owes_text(&debt, Currency::Clp),
        "Luis owes Ana $50"
    );
}

#[test]
fn test_unlisted_payer_is_left_out_of_pool() {
    let (ana, luis) = ana_and_luis();
    let former = Member::new(UserId::new(), "Marta");
    let members = vec![ana.clone(), luis.clone()];
    let expenses = vec![
        expense(dec!(100), &former, SplitMode::EqualSplit),
        expense(dec!(40), &ana, SplitMode::EqualSplit),
    ];

    for policy in [SharePolicy::AllExpenses, SharePolicy::BySplitMode] {
        let sheet = BalanceService::compute(&expenses, &members, &[], policy);
        assert_eq!(sheet.total, dec!(40));
        assert_eq!(sheet.member(ana.user_id).unwrap().balance, dec!(20));
        assert_eq!(sheet.member(luis.user_id).unwrap().balance, dec!(-20));
        assert!(sheet.net().is_zero());
    }
}

#[test]
fn test_settlement_clears_debt() {
    let (ana, luis) = ana_and_luis();
    let members = vec![ana.clone(), luis.clone()];
    let expenses = vec![expense(dec!(100), &ana, SplitMode::EqualSplit)];
    let settlements = vec![SettlementLine {
        from_user: luis.user_id,
        to_user: ana.user_id,
        amount: dec!(50),
    }];

    let sheet =
        BalanceService::compute(&expenses, &members, &settlements, SharePolicy::AllExpenses);

    assert_eq!(sheet.member(ana.user_id).unwrap().balance, dec!(0));
    assert_eq!(sheet.member(luis.user_id).unwrap().balance, dec!(0));
    assert!(BalanceService::who_owes_whom(&sheet).is_none());
}

#[test]
fn test_no_members_means_zero_share() {
    let payer = Member::new(UserId::new(), "Ana");
    let expenses = vec![expense(dec!(80), &payer, SplitMode::EqualSplit)];

    let sheet = BalanceService::compute(&expenses, &[], &[], SharePolicy::AllExpenses);

    assert_eq!(sheet.total, Decimal::ZERO);
    assert_eq!(sheet.equal_share, Decimal::ZERO);
    assert!(sheet.members.is_empty());
    assert!(BalanceService::who_owes_whom(&sheet).is_none());
}

#[test]
fn test_no_expenses_means_zero_balances() {
    let (ana, luis) = ana_and_luis();
    let sheet = BalanceService::compute(&[], &[ana, luis], &[], SharePolicy::AllExpenses);
    assert!(sheet.members.iter().all(|m| m.balance.is_zero()));
    assert!(BalanceService::who_owes_whom(&sheet).is_none());
}

#[test]
fn test_debt_below_a_cent_is_noise() {
    let (ana, luis) = ana_and_luis();
    let members = vec![ana.clone(), luis];
    let expenses = vec![expense(dec!(0.01), &ana, SplitMode::EqualSplit)];

    let sheet = BalanceService::compute(&expenses, &members, &[], SharePolicy::AllExpenses);
    assert!(BalanceService::who_owes_whom(&sheet).is_none());
}

#[test]
fn test_three_members_reports_extremes_only() {
    let ana = Member::new(UserId::new(), "Ana");
    let luis = Member::new(UserId::new(), "Luis");
    let sofia = Member::new(UserId::new(), "Sofía");
    let members = vec![ana.clone(), luis.clone(), sofia.clone()];
    let expenses = vec![
        expense(dec!(90), &ana, SplitMode::EqualSplit),
        expense(dec!(30), &sofia, SplitMode::EqualSplit),
    ];

    let sheet = BalanceService::compute(&expenses, &members, &[], SharePolicy::AllExpenses);
    assert_eq!(sheet.equal_share, dec!(40));

    let debt = BalanceService::who_owes_whom(&sheet).unwrap();
    assert_eq!(debt.debtor, luis);
    assert_eq!(debt.creditor, ana);
    assert_eq!(debt.amount, dec!(40));
}

#[test]
fn test_all_expenses_ignores_split_mode() {
    let (ana, luis) = ana_and_luis();
    let members = vec![ana.clone(), luis.clone()];
    let expenses = vec![
        expense(dec!(100), &ana, SplitMode::EqualSplit),
        expense(dec!(30), &luis, SplitMode::Personal),
    ];

    let sheet = BalanceService::compute(&expenses, &members, &[], SharePolicy::AllExpenses);
    assert_eq!(sheet.total, dec!(130));
    assert_eq!(sheet.member(ana.user_id).unwrap().balance, dec!(35));
    assert_eq!(sheet.member(luis.user_id).unwrap().balance, dec!(-35));
}

#[test]
fn test_by_split_mode_excludes_personal() {
    let (ana, luis) = ana_and_luis();
    let members = vec![ana.clone(), luis.clone()];
    let expenses = vec![
        expense(dec!(100), &ana, SplitMode::EqualSplit),
        expense(dec!(30), &luis, SplitMode::Personal),
    ];

    let sheet = BalanceService::compute(&expenses, &members, &[], SharePolicy::BySplitMode);
    assert_eq!(sheet.total, dec!(100));
    assert_eq!(sheet.member(luis.user_id).unwrap().paid, dec!(0));
    assert_eq!(sheet.member(ana.user_id).unwrap().balance, dec!(50));
    assert_eq!(sheet.member(luis.user_id).unwrap().balance, dec!(-50));
}

#[test]
fn test_by_split_mode_charges_beneficiary_in_full() {
    let (ana, luis) = ana_and_luis();
    let members = vec![ana.clone(), luis.clone()];
    let expenses = vec![expense(dec!(40), &ana, SplitMode::ForMember(luis.user_id))];

    let sheet = BalanceService::compute(&expenses, &members, &[], SharePolicy::BySplitMode);
    assert_eq!(sheet.total, dec!(0));
    assert_eq!(sheet.member(ana.user_id).unwrap().balance, dec!(40));
    assert_eq!(sheet.member(luis.user_id).unwrap().balance, dec!(-40));

    let debt = BalanceService::who_owes_whom(&sheet).unwrap();
    assert_eq!(
        BalanceService::owes_text(&debt, Currency::Usd),
        "Luis owes Ana $40.00"
    );
}

#[test]
fn test_unlisted_beneficiary_is_skipped() {
    let (ana, luis) = ana_and_luis();
    let stranger = UserId::new();
    let expenses = vec![expense(dec!(40), &ana, SplitMode::ForMember(stranger))];

    let sheet =
        BalanceService::compute(&expenses, &[ana, luis], &[], SharePolicy::BySplitMode);
    assert!(sheet.members.iter().all(|m| m.balance.is_zero()));
}

#[test]
fn test_create_then_delete_restores_balances() {
    let (ana, luis) = ana_and_luis();
    let members = vec![ana.clone(), luis.clone()];
    let mut expenses = vec![
        expense(dec!(100), &ana, SplitMode::EqualSplit),
        expense(dec!(12.34), &luis, SplitMode::EqualSplit),
    ];
    let before = BalanceService::compute(&expenses, &members, &[], SharePolicy::AllExpenses);

    expenses.push(expense(dec!(57.77), &luis, SplitMode::EqualSplit));
    let during = BalanceService::compute(&expenses, &members, &[], SharePolicy::AllExpenses);
    assert_ne!(during, before);

    expenses.pop();
    let after = BalanceService::compute(&expenses, &members, &[], SharePolicy::AllExpenses);
    assert_eq!(after, before);
}

#[test]
fn test_policy_from_str() {
    assert_eq!(
        "all_expenses".parse::<SharePolicy>(),
        Ok(SharePolicy::AllExpenses)
    );
    assert_eq!(
        "by_split_mode".parse::<SharePolicy>(),
        Ok(SharePolicy::BySplitMode)
    );
    assert!("equal".parse::<SharePolicy>().is_err());
}

fn split_from(index: u8, beneficiary: UserId) -> SplitMode {
    match index {
        0 => SplitMode::EqualSplit,
        1 => SplitMode::Personal,
        _ => SplitMode::ForMember(beneficiary),
    }
}

fn people(n: usize) -> Vec<Member> {
    (0..n)
        .map(|i| Member::new(UserId::new(), format!("m{i}")))
        .collect()
}

prop_compose! {
    fn family()(n in 1usize..6)(
        members in Just(people(n)),
        expenses in prop::collection::vec((1i64..10_000_000, 0..n, 0u8..3, 0..n), 0..20),
        settlements in prop::collection::vec((0..n, 0..n, 1i64..1_000_000), 0..10),
    ) -> (Vec<Member>, Vec<ExpenseLine>, Vec<SettlementLine>) {
        let expenses = expenses
            .into_iter()
            .map(|(cents, payer, split, beneficiary)| ExpenseLine {
                amount: Decimal::new(cents, 2),
                paid_by: members[payer].user_id,
                split: split_from(split, members[beneficiary].user_id),
            })
            .collect();
        let settlements = settlements
            .into_iter()
            .map(|(from, to, cents)| SettlementLine {
                from_user: members[from].user_id,
                to_user: members[to].user_id,
                amount: Decimal::new(cents, 2),
            })
            .collect();
        (members, expenses, settlements)
    }
}

prop_compose! {
    /// Like `family`, but payers, beneficiaries and settlement parties are
    /// drawn from a wider group that includes people who have left.
    fn family_with_former_members()(n in 0usize..5, former in 1usize..4)(
        n in Just(n),
        everyone in Just(people(n + former)),
        expenses in prop::collection::vec(
            (1i64..10_000_000, 0..n + former, 0u8..3, 0..n + former),
            0..20,
        ),
        settlements in prop::collection::vec(
            (0..n + former, 0..n + former, 1i64..1_000_000),
            0..10,
        ),
    ) -> (Vec<Member>, Vec<ExpenseLine>, Vec<SettlementLine>) {
        let expenses = expenses
            .into_iter()
            .map(|(cents, payer, split, beneficiary)| ExpenseLine {
                amount: Decimal::new(cents, 2),
                paid_by: everyone[payer].user_id,
                split: split_from(split, everyone[beneficiary].user_id),
            })
            .collect();
        let settlements = settlements
            .into_iter()
            .map(|(from, to, cents)| SettlementLine {
                from_user: everyone[from].user_id,
                to_user: everyone[to].user_id,
                amount: Decimal::new(cents, 2),
            })
            .collect();
        (everyone[..n].to_vec(), expenses, settlements)
    }
}

fn policy() -> impl Strategy<Value = SharePolicy> {
    prop_oneof![Just(SharePolicy::AllExpenses), Just(SharePolicy::BySplitMode)]
}

proptest! {
    /// Balances sum to zero before any settlement.
    #[test]
    fn prop_zero_sum_before_settlements(
        (members, expenses, _) in family(),
        policy in policy(),
    ) {
        let sheet = BalanceService::compute(&expenses, &members, &[], policy);
        prop_assert!(sheet.net().abs() < ZERO_SUM_TOLERANCE, "net = {}", sheet.net());
    }

    /// Settlements are zero-sum transfers.
    #[test]
    fn prop_zero_sum_after_settlements(
        (members, expenses, settlements) in family(),
        policy in policy(),
    ) {
        let sheet = BalanceService::compute(&expenses, &members, &settlements, policy);
        prop_assert!(sheet.net().abs() < ZERO_SUM_TOLERANCE, "net = {}", sheet.net());
    }

    /// Rows from people outside the member list never break the zero sum.
    #[test]
    fn prop_zero_sum_with_former_members(
        (members, expenses, settlements) in family_with_former_members(),
        policy in policy(),
    ) {
        let sheet = BalanceService::compute(&expenses, &members, &settlements, policy);
        prop_assert!(sheet.net().abs() < ZERO_SUM_TOLERANCE, "net = {}", sheet.net());
        let paid: Decimal = sheet.members.iter().map(|m| m.paid).sum();
        prop_assert_eq!(paid, sheet.total);
    }

    /// equal_share is total / n for any non-empty family.
    #[test]
    fn prop_equal_share((members, expenses, settlements) in family()) {
        let sheet = BalanceService::compute(
            &expenses, &members, &settlements, SharePolicy::AllExpenses,
        );
        let expected: Decimal = expenses.iter().map(|e| e.amount).sum();
        prop_assert_eq!(sheet.total, expected);
        prop_assert_eq!(sheet.equal_share, expected / Decimal::from(members.len()));
    }

    /// Paid totals add up to the pooled total.
    #[test]
    fn prop_paid_sums_to_total(
        (members, expenses, _) in family(),
        policy in policy(),
    ) {
        let sheet = BalanceService::compute(&expenses, &members, &[], policy);
        let paid: Decimal = sheet.members.iter().map(|m| m.paid).sum();
        prop_assert_eq!(paid, sheet.total);
    }

    /// The reported debt is never smaller than a cent and always names two people.
    #[test]
    fn prop_debt_is_meaningful((members, expenses, settlements) in family()) {
        let sheet = BalanceService::compute(
            &expenses, &members, &settlements, SharePolicy::AllExpenses,
        );
        if let Some(debt) = BalanceService::who_owes_whom(&sheet) {
            prop_assert!(debt.amount >= dec!(0.01));
            prop_assert_ne!(debt.debtor.user_id, debt.creditor.user_id);
        }
    }
}
