//! Initial database migration.
//!
//! Creates the enums, tables, `updated_at` triggers and row-level security
//! policies for the household schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS & FAMILIES
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(FAMILIES_SQL).await?;
        db.execute_unprepared(FAMILY_MEMBERS_SQL).await?;

        // ============================================================
        // PART 3: SHARED LEDGER
        // ============================================================
        db.execute_unprepared(EXPENSES_SQL).await?;
        db.execute_unprepared(EXPENSE_NOTES_SQL).await?;
        db.execute_unprepared(INCOMES_SQL).await?;
        db.execute_unprepared(SETTLEMENTS_SQL).await?;

        // ============================================================
        // PART 4: BUDGETS & FIXED EXPENSES
        // ============================================================
        db.execute_unprepared(CATEGORY_BUDGETS_SQL).await?;
        db.execute_unprepared(FIXED_EXPENSES_SQL).await?;

        // ============================================================
        // PART 5: PERSONAL FINANCES
        // ============================================================
        db.execute_unprepared(CREDIT_CARDS_SQL).await?;
        db.execute_unprepared(SAVINGS_SQL).await?;

        // ============================================================
        // PART 6: BUSINESS
        // ============================================================
        db.execute_unprepared(BUSINESS_SQL).await?;

        // ============================================================
        // PART 7: HOUSEHOLD LISTS, RECEIPTS & SNAPSHOTS
        // ============================================================
        db.execute_unprepared(SHOPPING_ITEMS_SQL).await?;
        db.execute_unprepared(FAMILY_EVENTS_SQL).await?;
        db.execute_unprepared(RECEIPTS_SQL).await?;
        db.execute_unprepared(MONTHLY_SNAPSHOTS_SQL).await?;

        // ============================================================
        // PART 8: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 9: ROW-LEVEL SECURITY
        // ============================================================
        db.execute_unprepared(RLS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE family_role AS ENUM ('owner', 'member');

-- '50/50' shared, 'personal' payer only, 'para_otro' on behalf of for_member
CREATE TYPE split_kind AS ENUM ('50/50', 'personal', 'para_otro');

CREATE TYPE card_movement_kind AS ENUM ('cargo', 'pago');
CREATE TYPE savings_movement_kind AS ENUM ('deposit', 'withdrawal');
CREATE TYPE business_transaction_kind AS ENUM ('sale', 'purchase');
CREATE TYPE receipt_target AS ENUM ('expense', 'business_transaction');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    display_name VARCHAR(100) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email) WHERE is_active = true;
";

const FAMILIES_SQL: &str = r"
CREATE TABLE families (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL,
    invite_code CHAR(8) NOT NULL UNIQUE,
    currency CHAR(3) NOT NULL DEFAULT 'USD',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_currency_format CHECK (currency ~ '^[A-Z]{3}$'),
    CONSTRAINT chk_invite_code_format CHECK (invite_code ~ '^[A-HJ-NP-Z2-9]{8}$')
);
";

const FAMILY_MEMBERS_SQL: &str = r"
CREATE TABLE family_members (
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    role family_role NOT NULL DEFAULT 'member',
    joined_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (family_id, user_id)
);

-- At most one owner per family
CREATE UNIQUE INDEX idx_family_members_owner ON family_members(family_id) WHERE role = 'owner';
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    amount NUMERIC(14, 2) NOT NULL,
    date DATE NOT NULL,
    category VARCHAR(50) NOT NULL,
    description TEXT,
    paid_by UUID NOT NULL REFERENCES users(id),
    split split_kind NOT NULL DEFAULT '50/50',
    for_member UUID REFERENCES users(id),
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_expense_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_expense_for_member CHECK ((split = 'para_otro') = (for_member IS NOT NULL)),
    CONSTRAINT chk_expense_for_member_not_payer CHECK (for_member IS NULL OR for_member <> paid_by)
);

CREATE INDEX idx_expenses_family_date ON expenses(family_id, date DESC);
CREATE INDEX idx_expenses_family_category ON expenses(family_id, category);
";

const EXPENSE_NOTES_SQL: &str = r"
CREATE TABLE expense_notes (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    expense_id UUID NOT NULL REFERENCES expenses(id) ON DELETE CASCADE,
    author_id UUID NOT NULL REFERENCES users(id),
    body TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_note_body_not_blank CHECK (length(trim(body)) > 0)
);

CREATE INDEX idx_expense_notes_expense ON expense_notes(expense_id, created_at);
";

const INCOMES_SQL: &str = r"
CREATE TABLE incomes (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    amount NUMERIC(14, 2) NOT NULL,
    date DATE NOT NULL,
    source VARCHAR(50) NOT NULL,
    description TEXT,
    received_by UUID NOT NULL REFERENCES users(id),
    split split_kind NOT NULL DEFAULT 'personal',
    for_member UUID REFERENCES users(id),
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_income_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_income_for_member CHECK ((split = 'para_otro') = (for_member IS NOT NULL)),
    CONSTRAINT chk_income_for_member_not_receiver CHECK (for_member IS NULL OR for_member <> received_by)
);

CREATE INDEX idx_incomes_family_date ON incomes(family_id, date DESC);
";

const SETTLEMENTS_SQL: &str = r"
CREATE TABLE settlements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    from_user UUID NOT NULL REFERENCES users(id),
    to_user UUID NOT NULL REFERENCES users(id),
    amount NUMERIC(14, 2) NOT NULL,
    date DATE NOT NULL,
    note TEXT,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_settlement_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_settlement_distinct_members CHECK (from_user <> to_user)
);

CREATE INDEX idx_settlements_family_date ON settlements(family_id, date DESC);
";

const CATEGORY_BUDGETS_SQL: &str = r"
CREATE TABLE category_budgets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    category VARCHAR(50) NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_category_budget UNIQUE (family_id, category),
    CONSTRAINT chk_budget_amount_non_negative CHECK (amount >= 0)
);
";

const FIXED_EXPENSES_SQL: &str = r"
CREATE TABLE fixed_expenses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    category VARCHAR(50) NOT NULL,
    due_day SMALLINT NOT NULL,
    is_recurring BOOLEAN NOT NULL DEFAULT true,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_fixed_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_due_day_range CHECK (due_day BETWEEN 1 AND 31)
);

CREATE INDEX idx_fixed_expenses_family ON fixed_expenses(family_id) WHERE is_active = true;

CREATE TABLE fixed_expense_payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    fixed_expense_id UUID NOT NULL REFERENCES fixed_expenses(id) ON DELETE CASCADE,
    month CHAR(7) NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    paid_by UUID NOT NULL REFERENCES users(id),
    paid_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_fixed_expense_month UNIQUE (fixed_expense_id, month),
    CONSTRAINT chk_payment_month_format CHECK (month ~ '^[0-9]{4}-(0[1-9]|1[0-2])$'),
    CONSTRAINT chk_payment_amount_positive CHECK (amount > 0)
);
";

const CREDIT_CARDS_SQL: &str = r"
CREATE TABLE credit_cards (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    credit_limit NUMERIC(14, 2) NOT NULL,
    initial_balance NUMERIC(14, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_credit_limit_non_negative CHECK (credit_limit >= 0)
);

CREATE INDEX idx_credit_cards_owner ON credit_cards(family_id, owner_id);

CREATE TABLE card_movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    card_id UUID NOT NULL REFERENCES credit_cards(id) ON DELETE CASCADE,
    kind card_movement_kind NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    date DATE NOT NULL,
    description TEXT,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_card_movement_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_card_movements_card ON card_movements(card_id, date DESC);
";

const SAVINGS_SQL: &str = r"
CREATE TABLE savings_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    goal NUMERIC(14, 2),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_goal_non_negative CHECK (goal IS NULL OR goal >= 0)
);

CREATE INDEX idx_savings_accounts_owner ON savings_accounts(family_id, owner_id);

CREATE TABLE savings_movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES savings_accounts(id) ON DELETE CASCADE,
    kind savings_movement_kind NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    date DATE NOT NULL,
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_savings_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_savings_movements_account ON savings_movements(account_id, date DESC);
";

const BUSINESS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    sku VARCHAR(50) NOT NULL,
    name VARCHAR(100) NOT NULL,
    unit_price NUMERIC(14, 2) NOT NULL,
    unit_cost NUMERIC(14, 2) NOT NULL,
    -- May go negative when sales are recorded ahead of purchases
    stock INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_product_sku UNIQUE (family_id, sku),
    CONSTRAINT chk_unit_price_non_negative CHECK (unit_price >= 0),
    CONSTRAINT chk_unit_cost_non_negative CHECK (unit_cost >= 0)
);

CREATE TABLE business_transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    kind business_transaction_kind NOT NULL,
    quantity INTEGER NOT NULL,
    unit_price NUMERIC(14, 2) NOT NULL,
    total NUMERIC(14, 2) NOT NULL,
    date DATE NOT NULL,
    note TEXT,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_quantity_positive CHECK (quantity > 0),
    CONSTRAINT chk_business_unit_price_non_negative CHECK (unit_price >= 0)
);

CREATE INDEX idx_business_transactions_family_date ON business_transactions(family_id, date DESC);
CREATE INDEX idx_business_transactions_product ON business_transactions(product_id);
";

const SHOPPING_ITEMS_SQL: &str = r"
CREATE TABLE shopping_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    quantity VARCHAR(50),
    is_checked BOOLEAN NOT NULL DEFAULT false,
    added_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_shopping_items_family ON shopping_items(family_id, is_checked);
";

const FAMILY_EVENTS_SQL: &str = r"
CREATE TABLE family_events (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    title VARCHAR(100) NOT NULL,
    date DATE NOT NULL,
    time TIME,
    description TEXT,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_family_events_family_date ON family_events(family_id, date);
";

const RECEIPTS_SQL: &str = r"
CREATE TABLE receipts (
    id UUID PRIMARY KEY,
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    target_kind receipt_target NOT NULL,
    target_id UUID NOT NULL,
    filename VARCHAR(255) NOT NULL,
    file_size BIGINT NOT NULL,
    mime_type VARCHAR(100) NOT NULL,
    storage_provider VARCHAR(20) NOT NULL,
    storage_bucket VARCHAR(255) NOT NULL,
    storage_key VARCHAR(1024) NOT NULL UNIQUE,
    uploaded_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_file_size_positive CHECK (file_size > 0)
);

CREATE INDEX idx_receipts_target ON receipts(family_id, target_kind, target_id);
";

const MONTHLY_SNAPSHOTS_SQL: &str = r"
CREATE TABLE monthly_snapshots (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    family_id UUID NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    month CHAR(7) NOT NULL,
    summary JSONB NOT NULL,
    total_expenses NUMERIC(14, 2) NOT NULL,
    total_income NUMERIC(14, 2) NOT NULL,
    closed_by UUID NOT NULL REFERENCES users(id),
    closed_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_snapshot_month UNIQUE (family_id, month),
    CONSTRAINT chk_snapshot_month_format CHECK (month ~ '^[0-9]{4}-(0[1-9]|1[0-2])$')
);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: set_updated_at
-- Keeps updated_at current on every UPDATE
-- ============================================================
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_families_updated_at BEFORE UPDATE ON families
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_expenses_updated_at BEFORE UPDATE ON expenses
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_incomes_updated_at BEFORE UPDATE ON incomes
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_category_budgets_updated_at BEFORE UPDATE ON category_budgets
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_fixed_expenses_updated_at BEFORE UPDATE ON fixed_expenses
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_credit_cards_updated_at BEFORE UPDATE ON credit_cards
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_savings_accounts_updated_at BEFORE UPDATE ON savings_accounts
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_products_updated_at BEFORE UPDATE ON products
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_shopping_items_updated_at BEFORE UPDATE ON shopping_items
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_family_events_updated_at BEFORE UPDATE ON family_events
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const RLS_SQL: &str = r"
-- ============================================================
-- ROW-LEVEL SECURITY POLICIES
-- Application sets context inside a transaction:
--   SET LOCAL app.current_family_id = 'family-uuid';
-- ============================================================

ALTER TABLE families ENABLE ROW LEVEL SECURITY;
ALTER TABLE family_members ENABLE ROW LEVEL SECURITY;
ALTER TABLE expenses ENABLE ROW LEVEL SECURITY;
ALTER TABLE expense_notes ENABLE ROW LEVEL SECURITY;
ALTER TABLE incomes ENABLE ROW LEVEL SECURITY;
ALTER TABLE settlements ENABLE ROW LEVEL SECURITY;
ALTER TABLE category_budgets ENABLE ROW LEVEL SECURITY;
ALTER TABLE fixed_expenses ENABLE ROW LEVEL SECURITY;
ALTER TABLE fixed_expense_payments ENABLE ROW LEVEL SECURITY;
ALTER TABLE credit_cards ENABLE ROW LEVEL SECURITY;
ALTER TABLE card_movements ENABLE ROW LEVEL SECURITY;
ALTER TABLE savings_accounts ENABLE ROW LEVEL SECURITY;
ALTER TABLE savings_movements ENABLE ROW LEVEL SECURITY;
ALTER TABLE products ENABLE ROW LEVEL SECURITY;
ALTER TABLE business_transactions ENABLE ROW LEVEL SECURITY;
ALTER TABLE shopping_items ENABLE ROW LEVEL SECURITY;
ALTER TABLE family_events ENABLE ROW LEVEL SECURITY;
ALTER TABLE receipts ENABLE ROW LEVEL SECURITY;
ALTER TABLE monthly_snapshots ENABLE ROW LEVEL SECURITY;

CREATE POLICY tenant_isolation ON families
    USING (id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON family_members
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON expenses
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON expense_notes
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON incomes
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON settlements
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON category_budgets
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON fixed_expenses
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON fixed_expense_payments
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON credit_cards
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON card_movements
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON savings_accounts
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON savings_movements
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON products
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON business_transactions
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON shopping_items
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON family_events
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON receipts
    USING (family_id = current_setting('app.current_family_id', true)::UUID);

CREATE POLICY tenant_isolation ON monthly_snapshots
    USING (family_id = current_setting('app.current_family_id', true)::UUID);
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

DROP FUNCTION IF EXISTS set_updated_at() CASCADE;

DROP TABLE IF EXISTS monthly_snapshots CASCADE;
DROP TABLE IF EXISTS receipts CASCADE;
DROP TABLE IF EXISTS family_events CASCADE;
DROP TABLE IF EXISTS shopping_items CASCADE;
DROP TABLE IF EXISTS business_transactions CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS savings_movements CASCADE;
DROP TABLE IF EXISTS savings_accounts CASCADE;
DROP TABLE IF EXISTS card_movements CASCADE;
DROP TABLE IF EXISTS credit_cards CASCADE;
DROP TABLE IF EXISTS fixed_expense_payments CASCADE;
DROP TABLE IF EXISTS fixed_expenses CASCADE;
DROP TABLE IF EXISTS category_budgets CASCADE;
DROP TABLE IF EXISTS settlements CASCADE;
DROP TABLE IF EXISTS incomes CASCADE;
DROP TABLE IF EXISTS expense_notes CASCADE;
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS family_members CASCADE;
DROP TABLE IF EXISTS families CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS receipt_target CASCADE;
DROP TYPE IF EXISTS business_transaction_kind CASCADE;
DROP TYPE IF EXISTS savings_movement_kind CASCADE;
DROP TYPE IF EXISTS card_movement_kind CASCADE;
DROP TYPE IF EXISTS split_kind CASCADE;
DROP TYPE IF EXISTS family_role CASCADE;
";
