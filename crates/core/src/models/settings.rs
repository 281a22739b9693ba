//! 站点设置模型
//!
//! 对 `settings` 表提供读写操作。

use rusqlite::{params, OptionalExtension};
use std::any::Any;

use super::{Model, SETTINGS_MODEL};
use crate::database::{self, DbConnection};
use crate::error::FirResult;
use crate::settings::Settings;

pub struct SettingsModel {
    db: DbConnection,
}

impl SettingsModel {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// 读取全部设置
    pub fn get_all(&self) -> FirResult<Settings> {
        let conn = database::lock(&self.db)?;
        let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut pairs = Vec::new();
        for row in rows {
            pairs.push(row?);
        }
        Ok(pairs.into_iter().collect())
    }

    /// 读取单个设置
    pub fn get(&self, key: &str) -> FirResult<Option<String>> {
        let conn = database::lock(&self.db)?;
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入设置（存在则覆盖）
    pub fn set(&self, key: &str, value: &str) -> FirResult<()> {
        let conn = database::lock(&self.db)?;
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// 写入缺失的默认值，已有的键保持不变。返回新写入的条数。
    pub fn seed_defaults(&self, defaults: &[(&str, &str)]) -> FirResult<usize> {
        let mut conn = database::lock(&self.db)?;
        let tx = conn.transaction()?;
        let mut inserted = 0;
        for (key, value) in defaults {
            inserted += tx.execute(
                "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(inserted)
    }
}

impl Model for SettingsModel {
    fn name(&self) -> &'static str {
        SETTINGS_MODEL
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
