use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::auth::TokenSigner;
use crate::otp::OtpStore;
use crate::payments::VnpayConfig;

mod from_row;
pub mod queries;
mod schema;

pub use schema::init_db;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    /// Gateway credentials used by the payment-url builder and the callback
    /// reconciler.
    pub vnpay: VnpayConfig,
    /// Bearer-token issue/verify.
    pub tokens: TokenSigner,
    /// Keyed one-time-code store with explicit expiry, owned here and passed
    /// down as a dependency.
    pub otp: Arc<OtpStore>,
}

pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path);
    Pool::builder().max_size(10).build(manager)
}
