//! `SeaORM` entities, one module per table.

pub mod prelude;

pub mod business_transactions;
pub mod card_movements;
pub mod category_budgets;
pub mod credit_cards;
pub mod expense_notes;
pub mod expenses;
pub mod families;
pub mod family_events;
pub mod family_members;
pub mod fixed_expense_payments;
pub mod fixed_expenses;
pub mod incomes;
pub mod monthly_snapshots;
pub mod products;
pub mod receipts;
pub mod savings_accounts;
pub mod savings_movements;
pub mod sea_orm_active_enums;
pub mod settlements;
pub mod shopping_items;
pub mod users;
