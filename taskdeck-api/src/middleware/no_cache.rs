/// Cache suppression middleware
///
/// Responses for `/api/*`, `/auth`, and `/logout` must never be cached:
/// they reflect the current session, and a cached copy outlives logout
/// (the browser back button would resurrect authenticated pages).
///
/// # Headers Applied
///
/// - `Cache-Control: no-cache, no-store, must-revalidate, max-age=0`
/// - `Pragma: no-cache`
/// - `Expires: 0`
///
/// # Example
///
/// ```no_run
/// use axum::Router;
/// use taskdeck_api::middleware::no_cache::NoCacheLayer;
///
/// let app: Router = Router::new().layer(NoCacheLayer::new());
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    response::Response,
};
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Cache suppression middleware layer
#[derive(Clone, Default)]
pub struct NoCacheLayer;

impl NoCacheLayer {
    /// Creates a new cache suppression layer
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for NoCacheLayer {
    type Service = NoCacheMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        NoCacheMiddleware { inner }
    }
}

/// Cache suppression middleware service
#[derive(Clone)]
pub struct NoCacheMiddleware<S> {
    inner: S,
}

/// Whether a request path serves session-dependent content
fn is_session_scoped(path: &str) -> bool {
    path.starts_with("/api/") || path == "/auth" || path == "/logout"
}

impl<S> Service<Request> for NoCacheMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let applies = is_session_scoped(request.uri().path());
        let future = self.inner.call(request);

        Box::pin(async move {
            let mut response = future.await?;

            if applies {
                let headers = response.headers_mut();
                headers.insert(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-cache, no-store, must-revalidate, max-age=0"),
                );
                headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
                headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
            }

            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_scoped_paths() {
        assert!(is_session_scoped("/api/me"));
        assert!(is_session_scoped("/api/tasks"));
        assert!(is_session_scoped("/api/reports/weekly"));
        assert!(is_session_scoped("/auth"));
        assert!(is_session_scoped("/logout"));
    }

    #[test]
    fn test_cacheable_paths() {
        assert!(!is_session_scoped("/health"));
        assert!(!is_session_scoped("/login"));
        assert!(!is_session_scoped("/"));
        // Only the /api/ subtree is session-scoped
        assert!(!is_session_scoped("/apiary"));
    }
}
