//! Entity aliases.

pub use super::business_transactions::Entity as BusinessTransactions;
pub use super::card_movements::Entity as CardMovements;
pub use super::category_budgets::Entity as CategoryBudgets;
pub use super::credit_cards::Entity as CreditCards;
pub use super::expense_notes::Entity as ExpenseNotes;
pub use super::expenses::Entity as Expenses;
pub use super::families::Entity as Families;
pub use super::family_events::Entity as FamilyEvents;
pub use super::family_members::Entity as FamilyMembers;
pub use super::fixed_expense_payments::Entity as FixedExpensePayments;
pub use super::fixed_expenses::Entity as FixedExpenses;
pub use super::incomes::Entity as Incomes;
pub use super::monthly_snapshots::Entity as MonthlySnapshots;
pub use super::products::Entity as Products;
pub use super::receipts::Entity as Receipts;
pub use super::savings_accounts::Entity as SavingsAccounts;
pub use super::savings_movements::Entity as SavingsMovements;
pub use super::settlements::Entity as Settlements;
pub use super::shopping_items::Entity as ShoppingItems;
pub use super::users::Entity as Users;
