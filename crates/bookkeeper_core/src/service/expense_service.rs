//! Expense use-case service.
//!
//! # Responsibility
//! - Combine the category and expense repositories behind one API.
//! - Build the category-resolved read model the presentation layer shows.
//!
//! # Invariants
//! - Recording an expense requires the referenced category to exist.
//! - Read models never mutate stored data.

use crate::model::category::Category;
use crate::model::expense::Expense;
use crate::repo::sqlite_repo::{Filter, RepoError, RepoResult, Repository};

/// One expense joined with its category name, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    pub expense: Expense,
    /// `None` when the referenced category no longer exists.
    pub category_name: Option<String>,
}

/// Use-case service wrapper over the two bookkeeper repositories.
pub struct ExpenseService<C, E>
where
    C: Repository<Category>,
    E: Repository<Expense>,
{
    categories: C,
    expenses: E,
}

impl<C, E> ExpenseService<C, E>
where
    C: Repository<Category>,
    E: Repository<Expense>,
{
    pub fn new(categories: C, expenses: E) -> Self {
        Self {
            categories,
            expenses,
        }
    }

    /// Creates a category and returns its assigned identity.
    pub fn add_category(&self, name: impl Into<String>) -> RepoResult<i64> {
        let mut category = Category::new(name);
        self.categories.add(&mut category)
    }

    /// All categories in identity order.
    pub fn categories(&self) -> RepoResult<Vec<Category>> {
        self.categories.get_all(&Filter::new())
    }

    /// Records an expense dated now, with an empty comment.
    ///
    /// # Errors
    /// - `InvalidArgument` when `category_pk` does not name a stored
    ///   category.
    pub fn record_expense(&self, amount: f64, category_pk: i64) -> RepoResult<i64> {
        self.record_expense_with_comment(amount, category_pk, "")
    }

    /// Records an expense dated now, with the given comment.
    pub fn record_expense_with_comment(
        &self,
        amount: f64,
        category_pk: i64,
        comment: &str,
    ) -> RepoResult<i64> {
        if self.categories.get(category_pk)?.is_none() {
            return Err(RepoError::InvalidArgument(format!(
                "no category with identity {category_pk}"
            )));
        }
        let mut expense = Expense::new(amount, category_pk);
        expense.comment = comment.to_string();
        self.expenses.add(&mut expense)
    }

    /// All expenses in identity order.
    pub fn expenses(&self) -> RepoResult<Vec<Expense>> {
        self.expenses.get_all(&Filter::new())
    }

    /// Expenses filed under one category, in identity order.
    pub fn expenses_in_category(&self, category_pk: i64) -> RepoResult<Vec<Expense>> {
        self.expenses
            .get_all(&Filter::new().with("category", category_pk))
    }

    /// Rewrites a stored expense with its current in-memory values.
    pub fn update_expense(&self, expense: &Expense) -> RepoResult<()> {
        self.expenses.update(expense)
    }

    /// Deletes one expense by identity.
    pub fn delete_expense(&self, pk: i64) -> RepoResult<()> {
        self.expenses.delete(pk)
    }

    /// Read model for the expense table: each expense joined with its
    /// category name.
    pub fn expense_rows(&self) -> RepoResult<Vec<ExpenseRow>> {
        let categories = self.categories()?;
        let rows = self
            .expenses()?
            .into_iter()
            .map(|expense| {
                let category_name = categories
                    .iter()
                    .find(|category| category.pk == expense.category)
                    .map(|category| category.name.clone());
                ExpenseRow {
                    expense,
                    category_name,
                }
            })
            .collect();
        Ok(rows)
    }
}
