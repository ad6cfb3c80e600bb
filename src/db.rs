use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use crate::timeline::{OnDemand, Program};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChannelRecord {
    pub(crate) number: u32,
    #[serde(default)]
    pub(crate) name: String,
    pub(crate) start_time: i64,
    #[serde(default)]
    pub(crate) duration: i64,
    #[serde(default)]
    pub(crate) programs: Vec<Program>,
    #[serde(default)]
    pub(crate) on_demand: OnDemand,
}

#[derive(Debug, Clone)]
pub(crate) struct ChannelSummary {
    pub(crate) number: u32,
    pub(crate) name: String,
    pub(crate) duration: i64,
    pub(crate) program_count: usize,
    pub(crate) updated_at: String,
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;
        Ok(Self { conn })
    }

    pub(crate) fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS channels (
                number INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                start_time INTEGER NOT NULL,
                duration INTEGER NOT NULL,
                programs TEXT NOT NULL,
                on_demand TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    pub(crate) fn save_channel(&self, record: &ChannelRecord) -> Result<()> {
        let programs =
            serde_json::to_string(&record.programs).context("failed to encode programs")?;
        let on_demand =
            serde_json::to_string(&record.on_demand).context("failed to encode on-demand state")?;
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            r#"
            INSERT INTO channels (number, name, start_time, duration, programs, on_demand, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(number) DO UPDATE SET
                name = excluded.name,
                start_time = excluded.start_time,
                duration = excluded.duration,
                programs = excluded.programs,
                on_demand = excluded.on_demand,
                updated_at = excluded.updated_at
            "#,
            params![
                record.number,
                record.name,
                record.start_time,
                record.duration,
                programs,
                on_demand,
                now
            ],
        )?;
        tracing::info!(
            channel = record.number,
            programs = record.programs.len(),
            "saved channel"
        );
        Ok(())
    }

    pub(crate) fn load_channel(&self, number: u32) -> Result<Option<ChannelRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT name, start_time, duration, programs, on_demand FROM channels WHERE number = ?1",
                params![number],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;
        let Some((name, start_time, duration, programs, on_demand)) = row else {
            return Ok(None);
        };

        let programs = serde_json::from_str(&programs)
            .with_context(|| format!("stored programs of channel {number} are corrupt"))?;
        let on_demand = serde_json::from_str(&on_demand)
            .with_context(|| format!("stored on-demand state of channel {number} is corrupt"))?;
        Ok(Some(ChannelRecord {
            number,
            name,
            start_time,
            duration,
            programs,
            on_demand,
        }))
    }

    pub(crate) fn list_channels(&self) -> Result<Vec<ChannelSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT number, name, duration, json_array_length(programs), updated_at FROM channels ORDER BY number",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ChannelSummary {
                number: row.get(0)?,
                name: row.get(1)?,
                duration: row.get(2)?,
                program_count: row.get::<_, i64>(3)?.max(0) as usize,
                updated_at: row.get(4)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub(crate) fn delete_channel(&self, number: u32) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM channels WHERE number = ?1", params![number])?;
        if removed > 0 {
            tracing::info!(channel = number, "deleted channel");
        }
        Ok(removed > 0)
    }
}
