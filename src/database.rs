//! # SQLite persistence
//!
//! Single shared connection guarded by an async mutex. The schema is created
//! on open, so a fresh file or `:memory:` works out of the box.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Timestamps stored as integer microseconds so far-future rows sort correctly
//! - 1.0.0: Reminders table with owner and trigger-time indexes

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use log::{debug, info};
use sqlite::{Connection, State, Statement};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::features::reminders::{NewReminder, Reminder, ReminderStore};

const MICROS_PER_SECOND: i64 = 1_000_000;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS reminders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        created_at INTEGER NOT NULL,
        trigger_at INTEGER NOT NULL,
        initiator_message_url TEXT NOT NULL,
        content TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_reminders_trigger_at ON reminders(trigger_at);
    CREATE INDEX IF NOT EXISTS idx_reminders_user_id ON reminders(user_id);
";

const REMINDER_COLUMNS: &str = "id, user_id, created_at, trigger_at, initiator_message_url, content";

#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    pub async fn new(database_path: &str) -> Result<Self> {
        let connection = sqlite::open(database_path)
            .with_context(|| format!("failed to open database at {database_path}"))?;
        connection
            .execute(SCHEMA)
            .context("failed to apply reminders schema")?;

        info!("Database ready at {database_path}");

        Ok(Database {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Total number of pending reminders across all users
    pub async fn count_reminders(&self) -> Result<i64> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare("SELECT COUNT(*) FROM reminders")?;
        statement.next()?;
        Ok(statement.read::<i64, _>(0)?)
    }

    /// Microseconds since the epoch; numeric order is time order for every year
    fn to_micros(ts: &NaiveDateTime) -> i64 {
        ts.and_utc().timestamp_micros()
    }

    fn from_micros(micros: i64) -> Result<NaiveDateTime> {
        let secs = micros.div_euclid(MICROS_PER_SECOND);
        let nanos = (micros.rem_euclid(MICROS_PER_SECOND) * 1_000) as u32;
        DateTime::from_timestamp(secs, nanos)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| anyhow!("invalid stored timestamp {micros}"))
    }

    fn read_reminder(statement: &Statement) -> Result<Reminder> {
        let created_at = statement.read::<i64, _>("created_at")?;
        let trigger_at = statement.read::<i64, _>("trigger_at")?;

        Ok(Reminder {
            id: Some(statement.read::<i64, _>("id")?),
            user_id: statement.read::<i64, _>("user_id")? as u64,
            created_at: Self::from_micros(created_at)?,
            trigger_at: Self::from_micros(trigger_at)?,
            initiator_message_url: statement.read::<String, _>("initiator_message_url")?,
            content: statement.read::<String, _>("content")?,
        })
    }

    /// Rows touched by the last statement on this connection
    fn changes(conn: &Connection) -> Result<i64> {
        let mut statement = conn.prepare("SELECT changes()")?;
        statement.next()?;
        Ok(statement.read::<i64, _>(0)?)
    }
}

#[async_trait]
impl ReminderStore for Database {
    async fn insert_reminder(&self, reminder: &NewReminder) -> Result<i64> {
        let conn = self.connection.lock().await;
        let created_at = Self::to_micros(&reminder.created_at);
        let trigger_at = Self::to_micros(&reminder.trigger_at);

        let mut statement = conn.prepare(
            "INSERT INTO reminders (user_id, created_at, trigger_at, initiator_message_url, content)
             VALUES (?, ?, ?, ?, ?)",
        )?;
        statement.bind((1, reminder.user_id as i64))?;
        statement.bind((2, created_at))?;
        statement.bind((3, trigger_at))?;
        statement.bind((4, reminder.initiator_message_url.as_str()))?;
        statement.bind((5, reminder.content.as_str()))?;
        statement.next()?;

        let mut statement = conn.prepare("SELECT last_insert_rowid()")?;
        if !matches!(statement.next()?, State::Row) {
            return Err(anyhow!("insert did not produce a row id"));
        }
        let id = statement.read::<i64, _>(0)?;

        debug!(
            "Stored reminder {id} for user {} due {}",
            reminder.user_id, reminder.trigger_at
        );
        Ok(id)
    }

    async fn next_reminder_before(&self, before: NaiveDateTime) -> Result<Option<Reminder>> {
        let conn = self.connection.lock().await;
        let before = Self::to_micros(&before);

        let mut statement = conn.prepare(format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE trigger_at < ? ORDER BY trigger_at, id LIMIT 1"
        ))?;
        statement.bind((1, before))?;

        if matches!(statement.next()?, State::Row) {
            Ok(Some(Self::read_reminder(&statement)?))
        } else {
            Ok(None)
        }
    }

    async fn delete_reminder_by_id(&self, id: i64) -> Result<bool> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare("DELETE FROM reminders WHERE id = ?")?;
        statement.bind((1, id))?;
        statement.next()?;
        Ok(Self::changes(&conn)? > 0)
    }

    async fn delete_user_reminder(&self, id: i64, user_id: u64) -> Result<bool> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare("DELETE FROM reminders WHERE id = ? AND user_id = ?")?;
        statement.bind((1, id))?;
        statement.bind((2, user_id as i64))?;
        statement.next()?;
        Ok(Self::changes(&conn)? > 0)
    }

    async fn clear_user_reminders(&self, user_id: u64) -> Result<bool> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare("DELETE FROM reminders WHERE user_id = ?")?;
        statement.bind((1, user_id as i64))?;
        statement.next()?;
        Ok(Self::changes(&conn)? > 0)
    }

    async fn get_user_reminders(&self, user_id: u64) -> Result<Vec<Reminder>> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE user_id = ? ORDER BY trigger_at, id"
        ))?;
        statement.bind((1, user_id as i64))?;

        let mut reminders = Vec::new();
        while let State::Row = statement.next()? {
            reminders.push(Self::read_reminder(&statement)?);
        }
        Ok(reminders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn base_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn new_reminder(user_id: u64, offset: Duration, content: &str) -> NewReminder {
        NewReminder {
            user_id,
            created_at: base_time(),
            trigger_at: base_time() + offset,
            initiator_message_url: "https://discord.com/channels/1/2/3".to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let db = Database::new(":memory:").await.unwrap();
        let first = db.insert_reminder(&new_reminder(1, Duration::days(1), "a")).await.unwrap();
        let second = db.insert_reminder(&new_reminder(1, Duration::days(2), "b")).await.unwrap();

        assert!(second > first);
        assert_eq!(db.count_reminders().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_round_trips_fields() {
        let db = Database::new(":memory:").await.unwrap();
        let new = new_reminder(42, Duration::milliseconds(90_500), "stretch");
        let id = db.insert_reminder(&new).await.unwrap();

        let stored = db.get_user_reminders(42).await.unwrap();
        assert_eq!(stored, vec![Reminder::from_new(id, new)]);
    }

    #[tokio::test]
    async fn test_next_reminder_respects_bound_and_order() {
        let db = Database::new(":memory:").await.unwrap();
        db.insert_reminder(&new_reminder(1, Duration::days(5), "late")).await.unwrap();
        let early = db.insert_reminder(&new_reminder(2, Duration::days(1), "early")).await.unwrap();
        db.insert_reminder(&new_reminder(3, Duration::days(50), "far")).await.unwrap();

        let next = db
            .next_reminder_before(base_time() + Duration::days(40))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.id, Some(early));

        let none = db
            .next_reminder_before(base_time() + Duration::hours(1))
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_delete_checks_owner() {
        let db = Database::new(":memory:").await.unwrap();
        let id = db.insert_reminder(&new_reminder(1, Duration::days(1), "mine")).await.unwrap();

        assert!(!db.delete_user_reminder(id, 2).await.unwrap());
        assert_eq!(db.count_reminders().await.unwrap(), 1);

        assert!(db.delete_user_reminder(id, 1).await.unwrap());
        assert!(!db.delete_user_reminder(id, 1).await.unwrap());
        assert_eq!(db.count_reminders().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_by_id_reports_missing_rows() {
        let db = Database::new(":memory:").await.unwrap();
        let id = db.insert_reminder(&new_reminder(1, Duration::days(1), "x")).await.unwrap();

        assert!(db.delete_reminder_by_id(id).await.unwrap());
        assert!(!db.delete_reminder_by_id(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_only_touches_owner() {
        let db = Database::new(":memory:").await.unwrap();
        db.insert_reminder(&new_reminder(1, Duration::days(1), "a")).await.unwrap();
        db.insert_reminder(&new_reminder(1, Duration::days(2), "b")).await.unwrap();
        db.insert_reminder(&new_reminder(2, Duration::days(3), "c")).await.unwrap();

        assert!(db.clear_user_reminders(1).await.unwrap());
        assert!(!db.clear_user_reminders(1).await.unwrap());
        assert_eq!(db.get_user_reminders(2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_user_reminders_sorted_by_trigger() {
        let db = Database::new(":memory:").await.unwrap();
        db.insert_reminder(&new_reminder(1, Duration::weeks(1), "week")).await.unwrap();
        db.insert_reminder(&new_reminder(1, Duration::hours(2), "hours")).await.unwrap();
        db.insert_reminder(&new_reminder(1, Duration::days(1), "day")).await.unwrap();

        let contents: Vec<String> = db
            .get_user_reminders(1)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.content)
            .collect();
        assert_eq!(contents, vec!["hours", "day", "week"]);
    }

    #[tokio::test]
    async fn test_far_future_rows_sort_after_near_ones() {
        let db = Database::new(":memory:").await.unwrap();
        let mut latest = new_reminder(1, Duration::zero(), "latest");
        latest.trigger_at = NaiveDateTime::MAX;
        db.insert_reminder(&latest).await.unwrap();
        db.insert_reminder(&new_reminder(1, Duration::weeks(420_000), "far")).await.unwrap();
        db.insert_reminder(&new_reminder(1, Duration::hours(2), "near")).await.unwrap();

        let next = db
            .next_reminder_before(base_time() + Duration::days(40))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.content, "near");

        let next = db.next_reminder_before(NaiveDateTime::MAX).await.unwrap().unwrap();
        assert_eq!(next.content, "near");

        let reminders = db.get_user_reminders(1).await.unwrap();
        let contents: Vec<&str> = reminders.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["near", "far", "latest"]);
        assert!(reminders.windows(2).all(|w| w[0].trigger_at <= w[1].trigger_at));
        assert_eq!(reminders[1].trigger_at, base_time() + Duration::weeks(420_000));
    }

    #[test]
    fn test_micros_round_trip_across_range() {
        for ts in [
            base_time() + Duration::microseconds(1),
            NaiveDateTime::MIN,
            NaiveDate::from_ymd_opt(1969, 12, 31)
                .unwrap()
                .and_hms_micro_opt(23, 59, 59, 999_999)
                .unwrap(),
        ] {
            assert_eq!(Database::from_micros(Database::to_micros(&ts)).unwrap(), ts);
        }
    }
}
