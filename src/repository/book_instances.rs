//! Book instances (copies) repository

use chrono::{Local, NaiveDate};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book_instance::{is_overdue, BookInstance, BorrowerRef, CreateBookInstance, LoanStatus},
};

const INSTANCE_SELECT: &str = r#"
    SELECT bi.id, bi.book_id, b.title AS book_title, bi.imprint, bi.status, bi.due_back,
           bi.borrower_id, u.username AS borrower_username
    FROM book_instances bi
    LEFT JOIN books b ON bi.book_id = b.id
    LEFT JOIN users u ON bi.borrower_id = u.id
"#;

fn instance_from_row(row: &PgRow, today: NaiveDate) -> AppResult<BookInstance> {
    let code: String = row.get("status");
    let status = code
        .parse::<LoanStatus>()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let due_back: Option<NaiveDate> = row.get("due_back");
    let borrower_id: Option<i32> = row.get("borrower_id");
    let borrower_username: Option<String> = row.get("borrower_username");

    Ok(BookInstance {
        id: row.get("id"),
        book_id: row.get("book_id"),
        book_title: row.get("book_title"),
        imprint: row.get("imprint"),
        status,
        status_label: status.label().to_string(),
        due_back,
        borrower: borrower_id.zip(borrower_username).map(|(id, username)| BorrowerRef { id, username }),
        is_overdue: is_overdue(due_back, today),
    })
}

fn instances_from_rows(rows: &[PgRow]) -> AppResult<Vec<BookInstance>> {
    let today = Local::now().date_naive();
    rows.iter().map(|row| instance_from_row(row, today)).collect()
}

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get copy by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        let query = format!("{} WHERE bi.id = $1", INSTANCE_SELECT);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))?;

        instance_from_row(&row, Local::now().date_naive())
    }

    /// Copies of a book, soonest due first
    pub async fn list_by_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let query = format!("{} WHERE bi.book_id = $1 ORDER BY bi.due_back", INSTANCE_SELECT);
        let rows = sqlx::query(&query)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        instances_from_rows(&rows)
    }

    /// Every copy currently on loan, soonest due first
    pub async fn list_on_loan(&self) -> AppResult<Vec<BookInstance>> {
        let query = format!("{} WHERE bi.status = $1 ORDER BY bi.due_back", INSTANCE_SELECT);
        let rows = sqlx::query(&query)
            .bind(LoanStatus::OnLoan.code())
            .fetch_all(&self.pool)
            .await?;
        instances_from_rows(&rows)
    }

    /// Copies on loan to one borrower, soonest due first
    pub async fn list_on_loan_by_borrower(&self, borrower_id: i32) -> AppResult<Vec<BookInstance>> {
        let query = format!(
            "{} WHERE bi.status = $1 AND bi.borrower_id = $2 ORDER BY bi.due_back",
            INSTANCE_SELECT
        );
        let rows = sqlx::query(&query)
            .bind(LoanStatus::OnLoan.code())
            .bind(borrower_id)
            .fetch_all(&self.pool)
            .await?;
        instances_from_rows(&rows)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
            .bind(status.code())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn create(&self, data: &CreateBookInstance) -> AppResult<BookInstance> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(data.book_id)
        .bind(&data.imprint)
        .bind(data.status.code())
        .bind(data.due_back)
        .execute(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Put a copy on loan to a borrower until `due_back`
    pub async fn lend(&self, id: Uuid, borrower_id: i32, due_back: NaiveDate) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE book_instances SET status = $1, borrower_id = $2, due_back = $3 WHERE id = $4",
        )
        .bind(LoanStatus::OnLoan.code())
        .bind(borrower_id)
        .bind(due_back)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }

    /// Replace the due date only; status and borrower are left alone
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        let result = sqlx::query("UPDATE book_instances SET due_back = $1 WHERE id = $2")
            .bind(due_back)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }
}
