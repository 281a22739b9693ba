//! 站点页面

mod home;
mod not_found;

pub use home::HomePage;
pub use not_found::NotFoundPage;

use fir_server::{PageRegistry, HOME_PAGE};
use std::sync::Arc;

/// 注册全部页面
pub fn registry() -> PageRegistry {
    let mut pages = PageRegistry::new(Arc::new(NotFoundPage));
    pages.register(HOME_PAGE, Arc::new(HomePage));
    pages
}
