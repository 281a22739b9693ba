//! 数据库连接
//!
//! 连接由宿主在请求之前打开，请求期间以共享句柄的形式传递。

pub mod schema;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{FirError, FirResult};

/// 共享数据库句柄
pub type DbConnection = Arc<Mutex<Connection>>;

/// 打开数据库文件并建表
pub fn open(path: &Path) -> FirResult<DbConnection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(path)?;
    schema::create_tables(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// 打开内存数据库（测试和临时站点）
pub fn open_in_memory() -> FirResult<DbConnection> {
    let conn = Connection::open_in_memory()?;
    schema::create_tables(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// 获取连接锁，锁被污染时返回错误而不是 panic
pub fn lock(db: &DbConnection) -> FirResult<MutexGuard<'_, Connection>> {
    db.lock().map_err(|e| FirError::DatabaseLock(e.to_string()))
}
