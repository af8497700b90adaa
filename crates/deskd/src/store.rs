//! SQLite-backed support store.
//!
//! Two tables: `tickets` (written by the pipeline, one insert plus at
//! most one reply update per ticket) and `customer_support` (read-only
//! for the pipeline; `upsert_customer` exists for seeding and tests).
//!
//! Every operation opens its own connection, scoped to the single
//! statement and released on every exit path; writes run in an
//! explicit transaction that commits on success and rolls back on
//! drop. Blocking rusqlite work runs under `spawn_blocking`.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use desk_common::{CustomerRecord, QueryScope, TicketAnalysis};

/// Store failure. Callers in the pipeline absorb these at the point of
/// use (logged, converted to a null id or an error-shaped lookup
/// outcome) rather than propagating them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("database directory error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("history column is not a JSON string list: {0}")]
    MalformedHistory(String),
}

/// Relational store seam used by the agents
#[async_trait]
pub trait SupportStore: Send + Sync {
    /// Insert a classified ticket row and return the server-assigned id
    async fn insert_ticket(
        &self,
        analysis: &TicketAnalysis,
        customer_id: Option<&str>,
        incoming_content: &str,
    ) -> Result<i64, StoreError>;

    /// Attach the recommended reply to an existing ticket row
    async fn attach_reply(&self, ticket_id: i64, recommended_answer: &str)
        -> Result<(), StoreError>;

    /// Fetch the customer fields selected by `scope`, or `None` when
    /// no row matches
    async fn fetch_customer(
        &self,
        customer_id: &str,
        scope: QueryScope,
    ) -> Result<Option<CustomerRecord>, StoreError>;
}

/// Persisted ticket row, read back for inspection and tests
#[derive(Debug, Clone)]
pub struct TicketRow {
    pub ticket_id: i64,
    pub customer_id: Option<String>,
    pub ticket_type: String,
    pub urgency: String,
    pub requires_customer_data: bool,
    pub requires_technical_help: bool,
    pub customer_sentiment: String,
    pub estimated_resolution_time: String,
    pub incoming_content: String,
    pub recommended_answer: Option<String>,
    pub created_at: String,
}

/// SQLite implementation of [`SupportStore`]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open the store at `db_path`, creating the parent directory and
    /// bootstrapping the schema if needed.
    pub async fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!("Opening support store at {}", db_path.display());

        let path = db_path.clone();
        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let conn = Connection::open(&path)?;
            initialize_schema(&conn)?;
            Ok(())
        })
        .await??;

        Ok(Self { db_path })
    }

    /// Insert or replace a customer row. Seed/demo/test plumbing only;
    /// the ticket pipeline itself never writes customers.
    pub async fn upsert_customer(
        &self,
        customer_id: &str,
        record: &CustomerRecord,
    ) -> Result<(), StoreError> {
        let path = self.db_path.clone();
        let customer_id = customer_id.to_string();
        let record = record.clone();

        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let history_json = match &record.support_history {
                Some(entries) => Some(
                    serde_json::to_string(entries)
                        .map_err(|e| StoreError::MalformedHistory(e.to_string()))?,
                ),
                None => None,
            };

            let mut conn = Connection::open(&path)?;
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT OR REPLACE INTO customer_support
                     (customer_id, name, email, plan, join_date, last_payment, support_history)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    customer_id,
                    record.name,
                    record.email,
                    record.plan,
                    record.join_date,
                    record.last_payment,
                    history_json,
                ],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await?
    }

    /// Read a ticket row back by id
    pub async fn get_ticket(&self, ticket_id: i64) -> Result<Option<TicketRow>, StoreError> {
        let path = self.db_path.clone();

        tokio::task::spawn_blocking(move || -> Result<Option<TicketRow>, StoreError> {
            let conn = Connection::open(&path)?;
            let row = conn
                .query_row(
                    "SELECT ticket_id, customer_id, ticket_type, urgency,
                            requires_customer_data, requires_technical_help,
                            customer_sentiment, estimated_resolution_time,
                            incoming_content, recommended_answer, created_at
                     FROM tickets WHERE ticket_id = ?1",
                    params![ticket_id],
                    |row| {
                        Ok(TicketRow {
                            ticket_id: row.get(0)?,
                            customer_id: row.get(1)?,
                            ticket_type: row.get(2)?,
                            urgency: row.get(3)?,
                            requires_customer_data: row.get(4)?,
                            requires_technical_help: row.get(5)?,
                            customer_sentiment: row.get(6)?,
                            estimated_resolution_time: row.get(7)?,
                            incoming_content: row.get(8)?,
                            recommended_answer: row.get(9)?,
                            created_at: row.get(10)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
        .await?
    }
}

fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS tickets (
            ticket_id INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_id TEXT,
            ticket_type TEXT NOT NULL,
            urgency TEXT NOT NULL,
            requires_customer_data INTEGER NOT NULL,
            requires_technical_help INTEGER NOT NULL,
            customer_sentiment TEXT NOT NULL,
            estimated_resolution_time TEXT NOT NULL,
            incoming_content TEXT NOT NULL,
            recommended_answer TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS customer_support (
            customer_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            plan TEXT,
            join_date TEXT,
            last_payment TEXT,
            support_history TEXT
        )",
        [],
    )?;

    debug!("Support store schema ready");
    Ok(())
}

/// Parse the nullable JSON history column; stored null becomes an
/// empty list whenever the scope selects history.
fn parse_history(raw: Option<String>) -> Result<Vec<String>, StoreError> {
    match raw {
        Some(json) => {
            serde_json::from_str(&json).map_err(|e| StoreError::MalformedHistory(e.to_string()))
        }
        None => Ok(Vec::new()),
    }
}

#[async_trait]
impl SupportStore for SqliteStore {
    async fn insert_ticket(
        &self,
        analysis: &TicketAnalysis,
        customer_id: Option<&str>,
        incoming_content: &str,
    ) -> Result<i64, StoreError> {
        let path = self.db_path.clone();
        let analysis = analysis.clone();
        let customer_id = customer_id.map(|s| s.to_string());
        let incoming_content = incoming_content.to_string();

        tokio::task::spawn_blocking(move || -> Result<i64, StoreError> {
            let mut conn = Connection::open(&path)?;
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO tickets (
                     customer_id, ticket_type, urgency,
                     requires_customer_data, requires_technical_help,
                     customer_sentiment, estimated_resolution_time,
                     incoming_content, created_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    customer_id,
                    analysis.ticket_type.to_string(),
                    analysis.urgency.to_string(),
                    analysis.requires_customer_data,
                    analysis.requires_technical_help,
                    analysis.customer_sentiment.to_string(),
                    analysis.estimated_resolution_time.to_string(),
                    incoming_content,
                    Utc::now().to_rfc3339(),
                ],
            )?;
            let ticket_id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(ticket_id)
        })
        .await?
    }

    async fn attach_reply(
        &self,
        ticket_id: i64,
        recommended_answer: &str,
    ) -> Result<(), StoreError> {
        let path = self.db_path.clone();
        let recommended_answer = recommended_answer.to_string();

        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let mut conn = Connection::open(&path)?;
            let tx = conn.transaction()?;
            tx.execute(
                "UPDATE tickets SET recommended_answer = ?1 WHERE ticket_id = ?2",
                params![recommended_answer, ticket_id],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await?
    }

    async fn fetch_customer(
        &self,
        customer_id: &str,
        scope: QueryScope,
    ) -> Result<Option<CustomerRecord>, StoreError> {
        let path = self.db_path.clone();
        let customer_id = customer_id.to_string();

        tokio::task::spawn_blocking(move || -> Result<Option<CustomerRecord>, StoreError> {
            let conn = Connection::open(&path)?;

            let record = match scope {
                QueryScope::Billing => conn
                    .query_row(
                        "SELECT name, plan, last_payment FROM customer_support
                         WHERE customer_id = ?1",
                        params![customer_id],
                        |row| {
                            Ok(CustomerRecord {
                                name: row.get(0)?,
                                plan: row.get(1)?,
                                last_payment: row.get(2)?,
                                status: Some("Active".to_string()),
                                ..Default::default()
                            })
                        },
                    )
                    .optional()?,
                QueryScope::History => {
                    let raw = conn
                        .query_row(
                            "SELECT name, support_history, join_date FROM customer_support
                             WHERE customer_id = ?1",
                            params![customer_id],
                            |row| {
                                Ok((
                                    row.get::<_, String>(0)?,
                                    row.get::<_, Option<String>>(1)?,
                                    row.get::<_, Option<String>>(2)?,
                                ))
                            },
                        )
                        .optional()?;

                    match raw {
                        Some((name, history, join_date)) => Some(CustomerRecord {
                            name,
                            support_history: Some(parse_history(history)?),
                            join_date,
                            ..Default::default()
                        }),
                        None => None,
                    }
                }
                QueryScope::Full => {
                    let raw = conn
                        .query_row(
                            "SELECT customer_id, name, email, plan, join_date,
                                    last_payment, support_history
                             FROM customer_support WHERE customer_id = ?1",
                            params![customer_id],
                            |row| {
                                Ok((
                                    row.get::<_, String>(0)?,
                                    row.get::<_, String>(1)?,
                                    row.get::<_, Option<String>>(2)?,
                                    row.get::<_, Option<String>>(3)?,
                                    row.get::<_, Option<String>>(4)?,
                                    row.get::<_, Option<String>>(5)?,
                                    row.get::<_, Option<String>>(6)?,
                                ))
                            },
                        )
                        .optional()?;

                    match raw {
                        Some((id, name, email, plan, join_date, last_payment, history)) => {
                            Some(CustomerRecord {
                                customer_id: Some(id),
                                name,
                                email,
                                plan,
                                join_date,
                                last_payment,
                                support_history: Some(parse_history(history)?),
                                status: None,
                            })
                        }
                        None => None,
                    }
                }
            };

            Ok(record)
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn temp_store() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path().join("desk.db")).await.unwrap();
        (dir, store)
    }

    fn sample_customer() -> CustomerRecord {
        CustomerRecord {
            name: "Sarah Meier".to_string(),
            email: Some("sarah@example.com".to_string()),
            plan: Some("Premium".to_string()),
            join_date: Some("2023-04-12".to_string()),
            last_payment: Some("2024-09-01".to_string()),
            support_history: None,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_ticket() {
        let (_dir, store) = temp_store().await;

        let analysis = TicketAnalysis::fallback();
        let id = store
            .insert_ticket(&analysis, Some("CUST001"), "Hello, my invoice looks wrong")
            .await
            .unwrap();

        let row = store.get_ticket(id).await.unwrap().unwrap();
        assert_eq!(row.customer_id.as_deref(), Some("CUST001"));
        assert_eq!(row.ticket_type, "general_inquiry");
        assert_eq!(row.estimated_resolution_time, "15min");
        assert!(row.requires_customer_data);
        assert!(!row.requires_technical_help);
        assert_eq!(row.incoming_content, "Hello, my invoice looks wrong");
        assert!(row.recommended_answer.is_none());
        assert!(chrono::DateTime::parse_from_rfc3339(&row.created_at).is_ok());
    }

    #[tokio::test]
    async fn test_attach_reply_updates_row() {
        let (_dir, store) = temp_store().await;

        let id = store
            .insert_ticket(&TicketAnalysis::fallback(), None, "ticket")
            .await
            .unwrap();
        store.attach_reply(id, "Sehr geehrte Kundin ...").await.unwrap();

        let row = store.get_ticket(id).await.unwrap().unwrap();
        assert_eq!(row.recommended_answer.as_deref(), Some("Sehr geehrte Kundin ..."));
    }

    #[tokio::test]
    async fn test_ids_are_serial() {
        let (_dir, store) = temp_store().await;

        let first = store
            .insert_ticket(&TicketAnalysis::fallback(), None, "a")
            .await
            .unwrap();
        let second = store
            .insert_ticket(&TicketAnalysis::fallback(), None, "b")
            .await
            .unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_fetch_billing_scope() {
        let (_dir, store) = temp_store().await;
        store
            .upsert_customer("CUST001", &sample_customer())
            .await
            .unwrap();

        let record = store
            .fetch_customer("CUST001", QueryScope::Billing)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.name, "Sarah Meier");
        assert_eq!(record.plan.as_deref(), Some("Premium"));
        assert_eq!(record.last_payment.as_deref(), Some("2024-09-01"));
        assert_eq!(record.status.as_deref(), Some("Active"));
        // Billing scope does not select these
        assert!(record.email.is_none());
        assert!(record.join_date.is_none());
        assert!(record.support_history.is_none());
    }

    #[tokio::test]
    async fn test_fetch_full_scope_normalizes_null_history() {
        let (_dir, store) = temp_store().await;
        store
            .upsert_customer("CUST001", &sample_customer())
            .await
            .unwrap();

        let record = store
            .fetch_customer("CUST001", QueryScope::Full)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.customer_id.as_deref(), Some("CUST001"));
        // Dates come back as ISO strings
        assert_eq!(record.join_date.as_deref(), Some("2023-04-12"));
        assert_eq!(record.last_payment.as_deref(), Some("2024-09-01"));
        // Stored null history reads back as an empty list, not None
        assert_eq!(record.support_history, Some(Vec::new()));
        assert!(record.status.is_none());
    }

    #[tokio::test]
    async fn test_fetch_history_scope_round_trips_entries() {
        let (_dir, store) = temp_store().await;
        let mut customer = sample_customer();
        customer.support_history = Some(vec![
            "2024-03-02: password reset".to_string(),
            "2024-06-18: plan upgrade".to_string(),
        ]);
        store.upsert_customer("CUST002", &customer).await.unwrap();

        let record = store
            .fetch_customer("CUST002", QueryScope::History)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.join_date.as_deref(), Some("2023-04-12"));
        assert_eq!(
            record.support_history.as_ref().map(|h| h.len()),
            Some(2)
        );
        // History scope does not select billing fields
        assert!(record.plan.is_none());
        assert!(record.last_payment.is_none());
    }

    #[tokio::test]
    async fn test_fetch_unknown_customer_is_none() {
        let (_dir, store) = temp_store().await;
        let record = store
            .fetch_customer("CUST999", QueryScope::Full)
            .await
            .unwrap();
        assert!(record.is_none());
    }
}
