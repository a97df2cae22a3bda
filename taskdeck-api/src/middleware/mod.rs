/// Middleware modules for the API server
///
/// This module contains custom middleware for:
/// - Cache suppression on authenticated responses

pub mod no_cache;
