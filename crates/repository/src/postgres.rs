use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{Batch, OrderLine};
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::{BatchReference, RepositoryError, Result, Sku, store::BatchRepository};

/// PostgreSQL-backed batch repository.
///
/// A batch is one row in `batches` plus one row in `allocations` per
/// allocated order line. `save` rewrites a batch's allocation rows inside a
/// transaction.
#[derive(Clone)]
pub struct PostgresBatchRepository {
    pool: PgPool,
}

/// Batch columns as read from the `batches` table, before allocations are attached.
struct BatchRow {
    reference: String,
    sku: String,
    purchased_quantity: u32,
    eta: Option<NaiveDate>,
}

impl PostgresBatchRepository {
    /// Creates a new PostgreSQL batch repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url` with a default pool.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_batch_row(row: &PgRow) -> Result<BatchRow> {
        Ok(BatchRow {
            reference: row.try_get("reference")?,
            sku: row.try_get("sku")?,
            purchased_quantity: to_quantity(row.try_get("purchased_quantity")?)?,
            eta: row.try_get("eta")?,
        })
    }

    fn row_to_line(row: &PgRow) -> Result<(String, OrderLine)> {
        let batch_reference: String = row.try_get("batch_reference")?;
        let orderid: String = row.try_get("orderid")?;
        let sku: String = row.try_get("sku")?;
        let qty = to_quantity(row.try_get("qty")?)?;
        Ok((batch_reference, OrderLine::new(orderid, sku, qty)))
    }

    /// Attaches allocation rows to their batch rows, keeping batch order.
    fn assemble(batch_rows: Vec<BatchRow>, line_rows: Vec<(String, OrderLine)>) -> Vec<Batch> {
        let mut lines: HashMap<String, Vec<OrderLine>> = HashMap::new();
        for (reference, line) in line_rows {
            lines.entry(reference).or_default().push(line);
        }

        batch_rows
            .into_iter()
            .map(|row| {
                let allocations = lines.remove(&row.reference).unwrap_or_default();
                Batch::restore(
                    row.reference,
                    row.sku,
                    row.purchased_quantity,
                    row.eta,
                    allocations,
                )
            })
            .collect()
    }

    async fn insert_allocations(
        tx: &mut Transaction<'_, Postgres>,
        batch: &Batch,
    ) -> Result<()> {
        for line in batch.allocations() {
            sqlx::query(
                r#"
                INSERT INTO allocations (batch_reference, orderid, sku, qty)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(batch.reference().as_str())
            .bind(line.orderid().as_str())
            .bind(line.sku().as_str())
            .bind(i64::from(line.qty()))
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn load_where(&self, sku: Option<&Sku>) -> Result<Vec<Batch>> {
        let batch_rows = sqlx::query(
            r#"
            SELECT reference, sku, purchased_quantity, eta
            FROM batches
            WHERE $1::TEXT IS NULL OR sku = $1
            ORDER BY reference
            "#,
        )
        .bind(sku.map(Sku::as_str))
        .fetch_all(&self.pool)
        .await?;

        let line_rows = sqlx::query(
            r#"
            SELECT a.batch_reference, a.orderid, a.sku, a.qty
            FROM allocations a
            JOIN batches b ON b.reference = a.batch_reference
            WHERE $1::TEXT IS NULL OR b.sku = $1
            ORDER BY a.id
            "#,
        )
        .bind(sku.map(Sku::as_str))
        .fetch_all(&self.pool)
        .await?;

        let batch_rows = batch_rows
            .iter()
            .map(Self::row_to_batch_row)
            .collect::<Result<Vec<_>>>()?;
        let line_rows = line_rows
            .iter()
            .map(Self::row_to_line)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::assemble(batch_rows, line_rows))
    }
}

fn to_quantity(value: i64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::InvalidData(format!("quantity out of range: {value}")))
}

#[async_trait]
impl BatchRepository for PostgresBatchRepository {
    async fn add(&self, batch: Batch) -> Result<()> {
        metrics::counter!("batch_repository_queries_total", "operation" => "add").increment(1);
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO batches (reference, sku, purchased_quantity, eta)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(batch.reference().as_str())
        .bind(batch.sku().as_str())
        .bind(i64::from(batch.purchased_quantity()))
        .bind(batch.eta())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::DuplicateBatch(batch.reference().clone());
            }
            RepositoryError::Database(e)
        })?;

        Self::insert_allocations(&mut tx, &batch).await?;
        tx.commit().await?;

        tracing::debug!(reference = %batch.reference(), sku = %batch.sku(), "added batch");
        Ok(())
    }

    async fn get(&self, reference: &BatchReference) -> Result<Option<Batch>> {
        metrics::counter!("batch_repository_queries_total", "operation" => "get").increment(1);

        let row = sqlx::query(
            r#"
            SELECT reference, sku, purchased_quantity, eta
            FROM batches
            WHERE reference = $1
            "#,
        )
        .bind(reference.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let batch_row = Self::row_to_batch_row(&row)?;

        let line_rows = sqlx::query(
            r#"
            SELECT batch_reference, orderid, sku, qty
            FROM allocations
            WHERE batch_reference = $1
            ORDER BY id
            "#,
        )
        .bind(reference.as_str())
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(Self::row_to_line)
        .collect::<Result<Vec<_>>>()?;

        Ok(Self::assemble(vec![batch_row], line_rows).pop())
    }

    async fn list(&self) -> Result<Vec<Batch>> {
        metrics::counter!("batch_repository_queries_total", "operation" => "list").increment(1);
        self.load_where(None).await
    }

    async fn list_for_sku(&self, sku: &Sku) -> Result<Vec<Batch>> {
        metrics::counter!("batch_repository_queries_total", "operation" => "list_for_sku")
            .increment(1);
        self.load_where(Some(sku)).await
    }

    async fn save(&self, batch: &Batch) -> Result<()> {
        metrics::counter!("batch_repository_queries_total", "operation" => "save").increment(1);
        let mut tx = self.pool.begin().await?;

        // Lock the batch row so concurrent saves of the same batch serialize.
        let exists = sqlx::query("SELECT 1 FROM batches WHERE reference = $1 FOR UPDATE")
            .bind(batch.reference().as_str())
            .fetch_optional(&mut *tx)
            .await?
            .is_some();

        if !exists {
            return Err(RepositoryError::BatchNotFound(batch.reference().clone()));
        }

        sqlx::query("DELETE FROM allocations WHERE batch_reference = $1")
            .bind(batch.reference().as_str())
            .execute(&mut *tx)
            .await?;

        Self::insert_allocations(&mut tx, batch).await?;
        tx.commit().await?;

        tracing::debug!(
            reference = %batch.reference(),
            allocated = batch.allocated_quantity(),
            "saved batch allocations"
        );
        Ok(())
    }
}
