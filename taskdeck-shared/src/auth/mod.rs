/// Authentication for Taskdeck
///
/// Login is delegated to Google OAuth; the server never sees a password.
/// After the callback, identity travels in a signed session token carried
/// by an HttpOnly cookie.
///
/// - `google`: OAuth authorization URL, code exchange, userinfo fetch
/// - `session`: signed session tokens and cookie helpers
/// - `middleware`: request authentication and the session user context

pub mod google;
pub mod middleware;
pub mod session;
