pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS installment_groups (
    id          TEXT PRIMARY KEY,
    user_id     INTEGER NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      INTEGER NOT NULL,
    kind         TEXT NOT NULL CHECK (kind IN ('expense', 'income', 'saved')),
    amount       TEXT NOT NULL,
    date         TEXT NOT NULL,
    description  TEXT NOT NULL CHECK (trim(description) != ''),
    group_id     TEXT REFERENCES installment_groups(id) ON DELETE CASCADE,
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id);
CREATE INDEX IF NOT EXISTS idx_transactions_group ON transactions(group_id);
CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
"#;

pub(crate) const CURRENT_VERSION: i32 = 2;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[
    // Version 1 had no installments
    (
        1,
        r#"
CREATE TABLE IF NOT EXISTS installment_groups (
    id          TEXT PRIMARY KEY,
    user_id     INTEGER NOT NULL,
    created_at  TEXT NOT NULL
);
ALTER TABLE transactions ADD COLUMN group_id TEXT REFERENCES installment_groups(id) ON DELETE CASCADE;
CREATE INDEX IF NOT EXISTS idx_transactions_group ON transactions(group_id);
"#,
    ),
];
