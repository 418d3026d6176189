#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn standalone(user: i64, kind: Kind, amount: Decimal, description: &str) -> NewTransaction {
    NewTransaction::standalone(
        UserId(user),
        kind,
        amount,
        date(2024, 1, 10),
        description.into(),
    )
}

fn installments(user: i64, group: &str, total: Decimal, count: u32) -> Vec<NewTransaction> {
    InstallmentPlan::new(total, count, date(2024, 1, 15), "Phone".into())
        .unwrap()
        .expand(UserId(user), group)
}

fn count_rows(db: &Database) -> i64 {
    db.conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))
        .unwrap()
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_schema_version() {
    let db = Database::open_in_memory().unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_migrates_version_one_database() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE schema_version (version INTEGER NOT NULL);
         INSERT INTO schema_version (version) VALUES (1);
         CREATE TABLE transactions (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             user_id INTEGER NOT NULL,
             kind TEXT NOT NULL,
             amount TEXT NOT NULL,
             date TEXT NOT NULL,
             description TEXT NOT NULL,
             created_at TEXT NOT NULL
         );
         INSERT INTO transactions (user_id, kind, amount, date, description, created_at)
         VALUES (1, 'income', '100', '2023-12-01', 'Old salary', '');",
    )
    .unwrap();

    let mut db = Database { conn };
    db.migrate().unwrap();

    let old = db.list_recent(UserId(1), 10, GroupedFilter::All).unwrap();
    assert_eq!(old.len(), 1);
    assert!(old[0].is_standalone());

    db.insert_batch(&installments(1, "g-1", dec!(100), 2)).unwrap();
    assert_eq!(db.list_recent_groups(UserId(1), 5).unwrap().len(), 1);
}

#[test]
fn test_open_file_twice_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spendless.db");
    {
        let mut db = Database::open(&path).unwrap();
        db.insert(&standalone(1, Kind::Income, dec!(10), "Gift")).unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.sum_by_kind(UserId(1), Kind::Income).unwrap(), dec!(10));
}

// ── Inserts ───────────────────────────────────────────────────

#[test]
fn test_insert_and_list_round_trip() {
    let mut db = Database::open_in_memory().unwrap();
    let id = db
        .insert(&standalone(1, Kind::Expense, dec!(50), "lunch"))
        .unwrap();

    let records = db.list_recent(UserId(1), 5, GroupedFilter::All).unwrap();
    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert_eq!(r.id, id);
    assert_eq!(r.kind, Kind::Expense);
    assert_eq!(r.amount, dec!(50));
    assert_eq!(r.date, date(2024, 1, 10));
    assert_eq!(r.description, "lunch");
    assert_eq!(r.group_id, None);
    assert!(!r.created_at.is_empty());
}

#[test]
fn test_insert_batch_shares_group() {
    let mut db = Database::open_in_memory().unwrap();
    let ids = db.insert_batch(&installments(1, "g-1", dec!(1000), 3)).unwrap();
    assert_eq!(ids.len(), 3);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));

    let grouped = db
        .list_recent(UserId(1), 10, GroupedFilter::GroupedOnly)
        .unwrap();
    assert_eq!(grouped.len(), 3);
    assert!(grouped.iter().all(|r| r.group_id.as_deref() == Some("g-1")));
}

#[test]
fn test_insert_batch_is_all_or_nothing() {
    let mut db = Database::open_in_memory().unwrap();
    let mut batch = installments(1, "g-1", dec!(300), 3);
    // Violates the description CHECK constraint on the last row
    batch[2].description = "   ".into();

    assert!(matches!(
        db.insert_batch(&batch),
        Err(StoreError::Persistence(_))
    ));
    assert_eq!(count_rows(&db), 0);
    assert!(db.list_recent_groups(UserId(1), 5).unwrap().is_empty());
}

#[test]
fn test_insert_single_grouped_record_creates_group() {
    let mut db = Database::open_in_memory().unwrap();
    let mut record = standalone(1, Kind::Expense, dec!(10), "Chair (1/2)");
    record.group_id = Some("g-9".into());
    let id = db.insert(&record).unwrap();

    let listed = db.list_recent(UserId(1), 5, GroupedFilter::GroupedOnly).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    let groups: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM installment_groups WHERE id = 'g-9'", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(groups, 1);
    assert_eq!(db.delete_by_group(UserId(1), "g-9").unwrap(), 1);
}

// ── Sums ──────────────────────────────────────────────────────

#[test]
fn test_sum_by_kind_is_exact() {
    let mut db = Database::open_in_memory().unwrap();
    for _ in 0..10 {
        db.insert(&standalone(1, Kind::Expense, dec!(0.10), "Candy"))
            .unwrap();
    }
    db.insert(&standalone(1, Kind::Income, dec!(1000), "Salary"))
        .unwrap();
    db.insert(&standalone(2, Kind::Expense, dec!(99), "Someone else"))
        .unwrap();

    assert_eq!(db.sum_by_kind(UserId(1), Kind::Expense).unwrap(), dec!(1.00));
    assert_eq!(db.sum_by_kind(UserId(1), Kind::Income).unwrap(), dec!(1000));
    assert_eq!(db.sum_by_kind(UserId(1), Kind::Saved).unwrap(), Decimal::ZERO);
}

#[test]
fn test_sums_report_overflow_instead_of_panicking() {
    let mut db = Database::open_in_memory().unwrap();
    let huge = Decimal::from_str("50000000000000000000000000000").unwrap();
    db.insert(&standalone(1, Kind::Income, huge, "Jackpot")).unwrap();
    db.insert(&standalone(1, Kind::Income, huge, "Jackpot again"))
        .unwrap();

    assert!(matches!(
        db.sum_by_kind(UserId(1), Kind::Income),
        Err(StoreError::Overflow)
    ));
    assert!(matches!(db.monthly_series(UserId(1)), Err(StoreError::Overflow)));
    assert_eq!(db.sum_by_kind(UserId(2), Kind::Income).unwrap(), Decimal::ZERO);
}

// ── Listing ───────────────────────────────────────────────────

#[test]
fn test_list_recent_orders_and_filters() {
    let mut db = Database::open_in_memory().unwrap();
    for i in 0..7 {
        db.insert(&standalone(1, Kind::Expense, dec!(1), &format!("item {i}")))
            .unwrap();
    }
    db.insert_batch(&installments(1, "g-1", dec!(100), 2)).unwrap();

    let standalone = db
        .list_recent(UserId(1), 5, GroupedFilter::StandaloneOnly)
        .unwrap();
    let names: Vec<&str> = standalone.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(names, vec!["item 6", "item 5", "item 4", "item 3", "item 2"]);

    let all = db.list_recent(UserId(1), 100, GroupedFilter::All).unwrap();
    assert_eq!(all.len(), 9);
    assert_eq!(all[0].description, "Phone (2/2)");
}

#[test]
fn test_list_recent_groups_summary() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_batch(&installments(1, "older", dec!(1000), 3)).unwrap();
    db.insert_batch(&installments(1, "newer", dec!(50), 2)).unwrap();
    db.insert_batch(&installments(2, "other-user", dec!(10), 2))
        .unwrap();

    let groups = db.list_recent_groups(UserId(1), 5).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].group_id, "newer");
    assert_eq!(groups[1].group_id, "older");

    let older = &groups[1];
    assert_eq!(older.count, 3);
    assert_eq!(older.total_amount, dec!(1000));
    assert_eq!(older.first_date, date(2024, 1, 15));
    assert_eq!(older.base_description, "Phone");
}

#[test]
fn test_list_recent_groups_limit() {
    let mut db = Database::open_in_memory().unwrap();
    for i in 0..7 {
        db.insert_batch(&installments(1, &format!("g-{i}"), dec!(10), 2))
            .unwrap();
    }
    let groups = db.list_recent_groups(UserId(1), 5).unwrap();
    let ids: Vec<&str> = groups.iter().map(|g| g.group_id.as_str()).collect();
    assert_eq!(ids, vec!["g-6", "g-5", "g-4", "g-3", "g-2"]);
}

#[test]
fn test_suffix_pattern_compiles() {
    assert!(INSTALLMENT_SUFFIX.is_some());
}

#[test]
fn test_strip_installment_suffix() {
    assert_eq!(strip_installment_suffix("Laptop (1/12)"), "Laptop");
    assert_eq!(strip_installment_suffix("TV (big) (2/3)"), "TV (big)");
    assert_eq!(strip_installment_suffix("Plain"), "Plain");
}

// ── Deletes ───────────────────────────────────────────────────

#[test]
fn test_delete_by_id() {
    let mut db = Database::open_in_memory().unwrap();
    let id = db
        .insert(&standalone(1, Kind::Expense, dec!(5), "Coffee"))
        .unwrap();

    assert!(!db.delete_by_id(UserId(2), id).unwrap(), "other users cannot delete it");
    assert!(db.delete_by_id(UserId(1), id).unwrap());
    assert!(!db.delete_by_id(UserId(1), id).unwrap());
    assert_eq!(count_rows(&db), 0);
}

#[test]
fn test_delete_by_group_removes_all_and_only_its_members() {
    let mut db = Database::open_in_memory().unwrap();
    let keep = db
        .insert(&standalone(1, Kind::Expense, dec!(5), "Coffee"))
        .unwrap();
    db.insert_batch(&installments(1, "g-1", dec!(1000), 3)).unwrap();
    db.insert_batch(&installments(1, "g-2", dec!(100), 2)).unwrap();

    assert_eq!(db.delete_by_group(UserId(1), "g-1").unwrap(), 3);

    let left = db.list_recent(UserId(1), 100, GroupedFilter::All).unwrap();
    assert_eq!(left.len(), 3);
    assert!(left.iter().any(|r| r.id == keep));
    assert!(left
        .iter()
        .filter(|r| !r.is_standalone())
        .all(|r| r.group_id.as_deref() == Some("g-2")));

    assert_eq!(db.delete_by_group(UserId(1), "g-1").unwrap(), 0);
}

#[test]
fn test_delete_standalone_never_touches_groups() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_batch(&installments(1, "g-1", dec!(90), 3)).unwrap();
    let id = db
        .insert(&standalone(1, Kind::Income, dec!(5), "Tip"))
        .unwrap();

    db.delete_by_id(UserId(1), id).unwrap();
    assert_eq!(db.list_recent_groups(UserId(1), 5).unwrap()[0].count, 3);
}

#[test]
fn test_delete_group_of_other_user_is_noop() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_batch(&installments(1, "g-1", dec!(90), 3)).unwrap();
    assert_eq!(db.delete_by_group(UserId(2), "g-1").unwrap(), 0);
    assert_eq!(count_rows(&db), 3);
}

// ── Monthly series ────────────────────────────────────────────

#[test]
fn test_monthly_series() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert(&standalone(1, Kind::Income, dec!(1000), "Salary"))
        .unwrap();
    db.insert(&standalone(1, Kind::Expense, dec!(20.5), "Food"))
        .unwrap();
    db.insert(&standalone(1, Kind::Expense, dec!(4.5), "Bus"))
        .unwrap();
    db.insert_batch(&installments(1, "g-1", dec!(1000), 3)).unwrap();

    let series = db.monthly_series(UserId(1)).unwrap();
    let flat: Vec<(&str, Kind, Decimal)> = series
        .iter()
        .map(|m| (m.month.as_str(), m.kind, m.total))
        .collect();
    assert_eq!(
        flat,
        vec![
            ("2024-01", Kind::Expense, dec!(358.33)),
            ("2024-01", Kind::Income, dec!(1000)),
            ("2024-02", Kind::Expense, dec!(333.33)),
            ("2024-03", Kind::Expense, dec!(333.34)),
        ]
    );
}

#[test]
fn test_monthly_series_empty() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.monthly_series(UserId(1)).unwrap().is_empty());
}
