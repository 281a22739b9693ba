//! 数据访问模型
//!
//! 模型按名称通过注册表实例化。注册表在进程启动时填充，
//! 每次调用都返回一个绑定到共享数据库句柄的新实例，不做复用。

mod settings;

pub use settings::SettingsModel;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::database::DbConnection;
use crate::error::{FirError, FirResult};

pub const SETTINGS_MODEL: &str = "Settings";

/// 数据访问模型
pub trait Model: Any + Send {
    /// 注册名称
    fn name(&self) -> &'static str;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

type ModelConstructor = Arc<dyn Fn(DbConnection) -> Box<dyn Model> + Send + Sync>;

/// 模型注册表：名称 -> 构造函数
#[derive(Clone, Default)]
pub struct ModelRegistry {
    constructors: HashMap<String, ModelConstructor>,
}

impl ModelRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建包含内置模型的注册表
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SETTINGS_MODEL, |db| Box::new(SettingsModel::new(db)));
        registry
    }

    /// 注册模型构造函数，同名注册会覆盖旧值
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(DbConnection) -> Box<dyn Model> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// 已注册名称（排序）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// 实例化模型
    pub fn create(&self, name: &str, db: &DbConnection) -> FirResult<Box<dyn Model>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| FirError::ModelNotFound(name.to_string()))?;
        Ok(constructor(Arc::clone(db)))
    }

    /// 实例化模型并还原为具体类型
    pub fn create_as<M: Model>(&self, name: &str, db: &DbConnection) -> FirResult<M> {
        self.create(name, db)?
            .into_any()
            .downcast::<M>()
            .map(|model| *model)
            .map_err(|_| FirError::ModelTypeMismatch(name.to_string()))
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.names())
            .finish()
    }
}
