/// Database layer for the PostgreSQL store adapters
///
/// - `pool`: Connection pool creation and health checks
/// - `migrations`: Embedded schema runner

pub mod migrations;
pub mod pool;
