use bookkeeper_core::db::open_db_in_memory;
use bookkeeper_core::{
    Category, Expense, ExpenseService, RepoError, Repository, SqliteRepository,
};

fn service(
    conn: &rusqlite::Connection,
) -> ExpenseService<SqliteRepository<'_, Category>, SqliteRepository<'_, Expense>> {
    let categories = SqliteRepository::try_new(conn).unwrap();
    let expenses = SqliteRepository::try_new(conn).unwrap();
    ExpenseService::new(categories, expenses)
}

#[test]
fn add_category_assigns_identity() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let pk = service.add_category("groceries").unwrap();
    let categories = service.categories().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].pk, pk);
    assert_eq!(categories[0].name, "groceries");
}

#[test]
fn record_expense_requires_existing_category() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service.record_expense(10.0, 5).unwrap_err();
    assert!(matches!(err, RepoError::InvalidArgument(_)));
    assert!(service.expenses().unwrap().is_empty());
}

#[test]
fn record_and_list_expenses() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let food = service.add_category("food").unwrap();
    let transport = service.add_category("transport").unwrap();

    service.record_expense(12.5, food).unwrap();
    service
        .record_expense_with_comment(2.75, transport, "bus")
        .unwrap();
    service.record_expense(30.0, food).unwrap();

    let all = service.expenses().unwrap();
    assert_eq!(all.len(), 3);

    let food_only = service.expenses_in_category(food).unwrap();
    assert_eq!(food_only.len(), 2);
    assert!(food_only.iter().all(|expense| expense.category == food));

    let transport_only = service.expenses_in_category(transport).unwrap();
    assert_eq!(transport_only.len(), 1);
    assert_eq!(transport_only[0].comment, "bus");
}

#[test]
fn expense_rows_join_category_names() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let rent = service.add_category("rent").unwrap();
    service.record_expense(800.0, rent).unwrap();

    // An expense pointing at a category that was never stored shows up
    // without a resolved name.
    let expenses: SqliteRepository<'_, Expense> = SqliteRepository::try_new(&conn).unwrap();
    let mut orphan = Expense::new(5.0, rent + 100);
    expenses.add(&mut orphan).unwrap();

    let rows = service.expense_rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].category_name.as_deref(), Some("rent"));
    assert_eq!(rows[0].expense.amount, 800.0);
    assert_eq!(rows[1].category_name, None);
}

#[test]
fn update_and_delete_expense_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let misc = service.add_category("misc").unwrap();
    let pk = service
        .record_expense_with_comment(19.99, misc, "draft")
        .unwrap();

    let mut expense = service.expenses().unwrap().remove(0);
    assert_eq!(expense.pk, pk);
    expense.amount = 24.99;
    expense.comment = "final".to_string();
    service.update_expense(&expense).unwrap();

    let reloaded = service.expenses().unwrap().remove(0);
    assert_eq!(reloaded.amount, 24.99);
    assert_eq!(reloaded.comment, "final");
    assert_eq!(reloaded.expense_date, expense.expense_date);

    service.delete_expense(pk).unwrap();
    assert!(service.expenses().unwrap().is_empty());
    let err = service.delete_expense(pk).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == pk));
}
