//! Demo data seeder for Hogar development.
//!
//! Creates Ana and Luis, a shared family and a month of household data so
//! the dashboard has something to show. Running it twice is a no-op.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Days, NaiveDate, NaiveTime, Utc};
use hogar_core::auth::hash_password;
use hogar_core::card::CardMovementKind;
use hogar_core::family::generate_invite_code;
use hogar_core::inventory::BusinessTransactionKind;
use hogar_core::month::MonthKey;
use hogar_core::savings::SavingsMovementKind;
use hogar_core::split::SplitMode;
use hogar_db::repositories::{
    CardFields, EventFields, ExpenseFields, FixedExpenseFields, IncomeFields,
    NewBusinessTransaction, NewCardMovement, NewSavingsMovement, NewSettlement, ProductFields,
    SavingsAccountFields,
};
use hogar_db::{
    BudgetRepository, CardRepository, EventRepository, ExpenseRepository, FamilyRepository,
    FixedExpenseRepository, IncomeRepository, InventoryRepository, SavingsRepository,
    SettlementRepository, ShoppingRepository, UserRepository,
};
use hogar_shared::types::{CardId, FamilyId, ProductId, SavingsAccountId, UserId};
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;

const ANA_EMAIL: &str = "ana@hogar.dev";
const LUIS_EMAIL: &str = "luis@hogar.dev";
const DEMO_PASSWORD: &str = "hogar-demo-2026";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = hogar_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let users = UserRepository::new(db.clone());
    if users.find_by_email(ANA_EMAIL).await?.is_some() {
        println!("Demo family already exists, skipping.");
        return Ok(());
    }

    println!("Seeding users...");
    let password_hash = hash_password(DEMO_PASSWORD)?;
    let ana = UserId::from_uuid(users.create(ANA_EMAIL, &password_hash, "Ana").await?.id);
    let luis = UserId::from_uuid(users.create(LUIS_EMAIL, &password_hash, "Luis").await?.id);

    println!("Seeding family...");
    let families = FamilyRepository::new(db.clone());
    let code = generate_invite_code(&mut rand::rng());
    let family = families.create_with_owner("Casa García", "MXN", ana, &code).await?;
    families.join(&family.invite_code, luis).await?;
    let family_id = FamilyId::from_uuid(family.id);

    let month = MonthKey::of(Utc::now().date_naive());
    let day = |n: u64| month.first_day() + Days::new(n);

    println!("Seeding expenses, incomes and settlements...");
    seed_money(&db, family_id, ana, luis, &day).await?;

    println!("Seeding budgets and bills...");
    seed_plans(&db, family_id, ana).await?;

    println!("Seeding cards and savings...");
    seed_personal(&db, family_id, ana, luis, &day).await?;

    println!("Seeding business, shopping list and events...");
    seed_household(&db, family_id, ana, luis, &day).await?;

    println!("Seeding complete! Sign in as {ANA_EMAIL} or {LUIS_EMAIL} with '{DEMO_PASSWORD}'.");
    Ok(())
}

async fn seed_money(
    db: &DatabaseConnection,
    family_id: FamilyId,
    ana: UserId,
    luis: UserId,
    day: &impl Fn(u64) -> NaiveDate,
) -> anyhow::Result<()> {
    let expenses = ExpenseRepository::new(db.clone());
    let shared = [
        (dec!(1850.40), 1, "Supermercado", "Despensa semanal", ana),
        (dec!(640.00), 3, "Servicios", "Luz bimestral", luis),
        (dec!(420.00), 6, "Restaurantes", "Cena de cumpleaños", ana),
        (dec!(1200.00), 9, "Supermercado", "Mercado", luis),
    ];
    for (amount, offset, category, description, paid_by) in shared {
        expenses
            .create(
                family_id,
                paid_by,
                ExpenseFields {
                    amount,
                    date: day(offset),
                    category: category.to_string(),
                    description: Some(description.to_string()),
                    paid_by,
                    split: SplitMode::EqualSplit,
                },
            )
            .await?;
    }
    expenses
        .create(
            family_id,
            ana,
            ExpenseFields {
                amount: dec!(350.00),
                date: day(4),
                category: "Ropa".to_string(),
                description: Some("Tenis".to_string()),
                paid_by: ana,
                split: SplitMode::Personal,
            },
        )
        .await?;
    expenses
        .create(
            family_id,
            luis,
            ExpenseFields {
                amount: dec!(280.00),
                date: day(7),
                category: "Salud".to_string(),
                description: Some("Farmacia para Ana".to_string()),
                paid_by: luis,
                split: SplitMode::ForMember(ana),
            },
        )
        .await?;

    let incomes = IncomeRepository::new(db.clone());
    for (amount, source, received_by) in [
        (dec!(24000.00), "Salario", ana),
        (dec!(21000.00), "Salario", luis),
    ] {
        incomes
            .create(
                family_id,
                received_by,
                IncomeFields {
                    amount,
                    date: day(0),
                    source: source.to_string(),
                    description: None,
                    received_by,
                    split: SplitMode::EqualSplit,
                },
            )
            .await?;
    }

    SettlementRepository::new(db.clone())
        .create(
            family_id,
            luis,
            NewSettlement {
                from_user: luis,
                to_user: ana,
                amount: dec!(100.00),
                date: day(10),
                note: Some("Transferencia".to_string()),
            },
        )
        .await?;
    Ok(())
}

async fn seed_plans(
    db: &DatabaseConnection,
    family_id: FamilyId,
    ana: UserId,
) -> anyhow::Result<()> {
    let budgets = BudgetRepository::new(db.clone());
    for (category, amount) in [
        ("Supermercado", dec!(4000.00)),
        ("Servicios", dec!(1500.00)),
        ("Restaurantes", dec!(800.00)),
    ] {
        budgets.upsert(family_id, category, amount).await?;
    }

    let bills = FixedExpenseRepository::new(db.clone());
    for (name, amount, category, due_day) in [
        ("Renta", dec!(9500.00), "Vivienda", 1),
        ("Internet", dec!(599.00), "Servicios", 10),
        ("Gimnasio", dec!(450.00), "Salud", 31),
    ] {
        bills
            .create(
                family_id,
                ana,
                FixedExpenseFields {
                    name: name.to_string(),
                    amount,
                    category: category.to_string(),
                    due_day,
                    recurring: true,
                    active: true,
                },
            )
            .await?;
    }
    Ok(())
}

async fn seed_personal(
    db: &DatabaseConnection,
    family_id: FamilyId,
    ana: UserId,
    luis: UserId,
    day: &impl Fn(u64) -> NaiveDate,
) -> anyhow::Result<()> {
    let cards = CardRepository::new(db.clone());
    let card = cards
        .create(
            family_id,
            ana,
            CardFields {
                name: "Visa Oro".to_string(),
                credit_limit: dec!(30000.00),
                initial_balance: dec!(2500.00),
            },
        )
        .await?;
    let card_id = CardId::from_uuid(card.id);
    for (kind, amount, offset) in [
        (CardMovementKind::Cargo, dec!(1899.00), 2),
        (CardMovementKind::Pago, dec!(2500.00), 5),
    ] {
        cards
            .add_movement(
                family_id,
                card_id,
                ana,
                NewCardMovement {
                    kind,
                    amount,
                    date: day(offset),
                    description: None,
                },
            )
            .await?;
    }

    let savings = SavingsRepository::new(db.clone());
    let account = savings
        .create(
            family_id,
            luis,
            SavingsAccountFields {
                name: "Vacaciones".to_string(),
                goal: Some(dec!(20000.00)),
            },
        )
        .await?;
    let account_id = SavingsAccountId::from_uuid(account.id);
    for (kind, amount) in [
        (SavingsMovementKind::Deposit, dec!(5000.00)),
        (SavingsMovementKind::Withdrawal, dec!(800.00)),
    ] {
        savings
            .add_movement(
                family_id,
                account_id,
                NewSavingsMovement {
                    kind,
                    amount,
                    date: day(2),
                    note: None,
                },
            )
            .await?;
    }
    Ok(())
}

async fn seed_household(
    db: &DatabaseConnection,
    family_id: FamilyId,
    ana: UserId,
    luis: UserId,
    day: &impl Fn(u64) -> NaiveDate,
) -> anyhow::Result<()> {
    let inventory = InventoryRepository::new(db.clone());
    let product = inventory
        .create_product(
            family_id,
            ProductFields {
                sku: "TAM-01".to_string(),
                name: "Tamales (docena)".to_string(),
                unit_price: dec!(180.00),
                unit_cost: dec!(95.00),
            },
            10,
        )
        .await?;
    let product_id = ProductId::from_uuid(product.id);
    for (kind, quantity, offset) in [
        (BusinessTransactionKind::Sale, 4, 3),
        (BusinessTransactionKind::Purchase, 6, 5),
        (BusinessTransactionKind::Sale, 3, 8),
    ] {
        inventory
            .record(
                family_id,
                ana,
                NewBusinessTransaction {
                    product_id,
                    kind,
                    quantity,
                    unit_price: None,
                    date: day(offset),
                    note: None,
                },
            )
            .await?;
    }

    let shopping = ShoppingRepository::new(db.clone());
    for (name, quantity, added_by) in [
        ("Leche", Some("2 L"), ana),
        ("Tortillas", Some("1 kg"), luis),
        ("Detergente", None, ana),
    ] {
        shopping
            .add(family_id, added_by, name, quantity.map(str::to_string))
            .await?;
    }

    EventRepository::new(db.clone())
        .create(
            family_id,
            luis,
            EventFields {
                title: "Junta escolar".to_string(),
                date: day(14),
                time: NaiveTime::from_hms_opt(18, 30, 0),
                description: None,
            },
        )
        .await?;
    Ok(())
}
