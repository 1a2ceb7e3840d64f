//! Initial database migration.
//!
//! Creates the enums, the admin, customer and store tables, the store
//! managers join table and the append-only transaction log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(ADMINS_SQL).await?;
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(STORES_SQL).await?;
        db.execute_unprepared(STORE_ADMINS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

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
CREATE TYPE trade_type AS ENUM ('buy', 'sell');

CREATE TYPE payment_method AS ENUM (
    'cash',
    'borrowed_gold',
    'borrowed_money',
    'upi'
);
";

const ADMINS_SQL: &str = r"
CREATE TABLE admins (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    phone VARCHAR(32) NOT NULL UNIQUE,
    address TEXT NOT NULL DEFAULT '',

    -- Balance mirror, moved only by posting
    borrowed_gold NUMERIC(28, 8) NOT NULL DEFAULT 0,
    total_bought NUMERIC(28, 8) NOT NULL DEFAULT 0,
    total_sold NUMERIC(28, 8) NOT NULL DEFAULT 0,
    borrowed_amount NUMERIC(28, 8) NOT NULL DEFAULT 0,

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_customers_created_at ON customers(created_at DESC);
";

const STORES_SQL: &str = r"
CREATE TABLE stores (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE,
    created_by UUID REFERENCES admins(id) ON DELETE SET NULL,

    -- Balance mirror; total_amount is not moved by posting
    total_gold NUMERIC(28, 8) NOT NULL DEFAULT 0,
    total_amount NUMERIC(28, 8) NOT NULL DEFAULT 0,
    gold_taken NUMERIC(28, 8) NOT NULL DEFAULT 0,
    amount_taken NUMERIC(28, 8) NOT NULL DEFAULT 0,
    gold_given NUMERIC(28, 8) NOT NULL DEFAULT 0,
    amount_given NUMERIC(28, 8) NOT NULL DEFAULT 0,

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const STORE_ADMINS_SQL: &str = r"
CREATE TABLE store_admins (
    store_id UUID NOT NULL REFERENCES stores(id) ON DELETE CASCADE,
    admin_id UUID NOT NULL REFERENCES admins(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (store_id, admin_id)
);

CREATE INDEX idx_store_admins_admin ON store_admins(admin_id);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE RESTRICT,
    store_id UUID NOT NULL REFERENCES stores(id) ON DELETE RESTRICT,
    posted_by UUID REFERENCES admins(id) ON DELETE SET NULL,
    trade_type trade_type NOT NULL,
    gold_weight NUMERIC(28, 8) NOT NULL,
    gold_price NUMERIC(28, 8) NOT NULL,
    amount NUMERIC(28, 8) NOT NULL,
    payment_method payment_method NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_transactions_weight_positive CHECK (gold_weight > 0),
    CONSTRAINT chk_transactions_price_positive CHECK (gold_price > 0),
    CONSTRAINT chk_transactions_amount CHECK (amount = gold_weight * gold_price)
);

CREATE INDEX idx_transactions_created_at ON transactions(created_at);
CREATE INDEX idx_transactions_customer ON transactions(customer_id, created_at);
CREATE INDEX idx_transactions_store ON transactions(store_id, created_at);
";

const TRIGGERS_SQL: &str = r"
-- Recorded transactions are immutable. posted_by may still be cleared by
-- ON DELETE SET NULL when the posting admin is removed.
CREATE OR REPLACE FUNCTION prevent_transaction_update()
RETURNS TRIGGER AS $$
BEGIN
    IF NEW.id IS DISTINCT FROM OLD.id
        OR NEW.customer_id IS DISTINCT FROM OLD.customer_id
        OR NEW.store_id IS DISTINCT FROM OLD.store_id
        OR NEW.trade_type IS DISTINCT FROM OLD.trade_type
        OR NEW.gold_weight IS DISTINCT FROM OLD.gold_weight
        OR NEW.gold_price IS DISTINCT FROM OLD.gold_price
        OR NEW.amount IS DISTINCT FROM OLD.amount
        OR NEW.payment_method IS DISTINCT FROM OLD.payment_method
        OR NEW.description IS DISTINCT FROM OLD.description
        OR NEW.created_at IS DISTINCT FROM OLD.created_at
    THEN
        RAISE EXCEPTION 'transactions are immutable';
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_transactions_immutable
    BEFORE UPDATE ON transactions
    FOR EACH ROW EXECUTE FUNCTION prevent_transaction_update();
";

const DROP_ALL_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_transactions_immutable ON transactions;
DROP FUNCTION IF EXISTS prevent_transaction_update();
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS store_admins;
DROP TABLE IF EXISTS stores;
DROP TABLE IF EXISTS customers;
DROP TABLE IF EXISTS admins;
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS trade_type;
";
