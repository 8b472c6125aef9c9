//! Postgres DDL, applied in order by `db::ensure_schema`.

pub const PARENTS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS parents (
        id             UUID         PRIMARY KEY,
        display_name   TEXT         NOT NULL,
        email          TEXT,
        created_at     TIMESTAMPTZ  NOT NULL DEFAULT now()
    )";

pub const INTAKE_FORMS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS intake_forms (
        id             UUID         PRIMARY KEY,
        parent_id      UUID         NOT NULL UNIQUE REFERENCES parents(id) ON DELETE CASCADE,
        data           JSONB        NOT NULL,
        created_at     TIMESTAMPTZ  NOT NULL DEFAULT now(),
        updated_at     TIMESTAMPTZ  NOT NULL DEFAULT now()
    )";

pub const RESOURCES_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS resources (
        id             UUID         PRIMARY KEY,
        title          TEXT         NOT NULL,
        description    TEXT,
        subject        TEXT         NOT NULL,
        url            TEXT,
        resource_type  TEXT         NOT NULL,
        grade_levels   TEXT[]       NOT NULL DEFAULT '{}',
        created_by     UUID,
        created_at     TIMESTAMPTZ  NOT NULL DEFAULT now()
    )";

pub const RESOURCE_FAVORITES_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS resource_favorites (
        parent_id      UUID         NOT NULL,
        resource_id    UUID         NOT NULL REFERENCES resources(id) ON DELETE CASCADE,
        created_at     TIMESTAMPTZ  NOT NULL DEFAULT now(),

        PRIMARY KEY (parent_id, resource_id)
    )";

pub const RESOURCE_COLLECTIONS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS resource_collections (
        id             UUID         PRIMARY KEY,
        parent_id      UUID         NOT NULL,
        name           TEXT         NOT NULL,
        description    TEXT,
        count          INTEGER      NOT NULL DEFAULT 0 CHECK (count >= 0),
        created_at     TIMESTAMPTZ  NOT NULL DEFAULT now()
    )";

pub const RESOURCE_COLLECTION_MAPPINGS_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS resource_collection_mappings (
        collection_id  UUID         NOT NULL REFERENCES resource_collections(id) ON DELETE CASCADE,
        resource_id    UUID         NOT NULL REFERENCES resources(id) ON DELETE CASCADE,
        created_at     TIMESTAMPTZ  NOT NULL DEFAULT now(),

        PRIMARY KEY (collection_id, resource_id)
    )";

pub const REWARD_ACCOUNTS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS reward_accounts (
        student_id     UUID         PRIMARY KEY,
        coins          BIGINT       NOT NULL DEFAULT 0 CHECK (coins >= 0),
        streak_days    INTEGER      NOT NULL DEFAULT 0,
        longest_streak INTEGER      NOT NULL DEFAULT 0,
        updated_at     TIMESTAMPTZ  NOT NULL DEFAULT now()
    )";

pub const COIN_TRANSACTIONS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS coin_transactions (
        id             UUID         PRIMARY KEY,
        student_id     UUID         NOT NULL REFERENCES reward_accounts(student_id) ON DELETE CASCADE,
        delta          BIGINT       NOT NULL,
        balance_after  BIGINT       NOT NULL,
        reason         TEXT         NOT NULL,
        created_at     TIMESTAMPTZ  NOT NULL DEFAULT now()
    )";

/// (table name, DDL) in dependency order.
pub const SCHEMA: &[(&str, &str)] = &[
    ("parents", PARENTS_SCHEMA),
    ("intake_forms", INTAKE_FORMS_SCHEMA),
    ("resources", RESOURCES_SCHEMA),
    ("resource_favorites", RESOURCE_FAVORITES_SCHEMA),
    ("resource_collections", RESOURCE_COLLECTIONS_SCHEMA),
    ("resource_collection_mappings", RESOURCE_COLLECTION_MAPPINGS_SCHEMA),
    ("reward_accounts", REWARD_ACCOUNTS_SCHEMA),
    ("coin_transactions", COIN_TRANSACTIONS_SCHEMA),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_statement_is_idempotent() {
        for (table, ddl) in SCHEMA {
            assert!(
                ddl.starts_with(&format!("CREATE TABLE IF NOT EXISTS {table} (")),
                "{table} DDL does not match its name"
            );
        }
    }

    #[test]
    fn test_referenced_tables_created_first() {
        for (i, (table, ddl)) in SCHEMA.iter().enumerate() {
            for (later, _) in SCHEMA.iter().skip(i + 1) {
                assert!(
                    !ddl.contains(&format!("REFERENCES {later}(")),
                    "{table} references {later} before it exists"
                );
            }
        }
    }
}
