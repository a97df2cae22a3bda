/// Database utilities
///
/// This module provides the PostgreSQL connection pool and the embedded
/// migration runner.
///
/// - `pool`: Connection pool creation and health checks
/// - `migrations`: Schema migration runner

pub mod migrations;
pub mod pool;
