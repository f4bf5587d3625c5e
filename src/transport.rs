use std::sync::Arc;

use futures::future::BoxFuture;
use http::{HeaderName, HeaderValue};
use reqwest::{Request, Response};

/// Something that can put a prepared request on the wire.
pub trait Transport: Send + Sync {
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Response, reqwest::Error>>;
}

impl Transport for reqwest::Client {
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Response, reqwest::Error>> {
        Box::pin(reqwest::Client::execute(self, request))
    }
}

/// Wraps a transport in another one.
pub type Middleware = Box<dyn FnOnce(Arc<dyn Transport>) -> Arc<dyn Transport> + Send>;

/// Composes `middlewares` around `base` (a default `reqwest::Client` when `None`).
///
/// Middleware run in list order: the first one sees the request first and the
/// last one mutates it last, right before the base transport sends it. When two
/// middleware set the same header the later one in the list wins.
pub fn chain(base: Option<Arc<dyn Transport>>, middlewares: Vec<Middleware>) -> Arc<dyn Transport> {
    let mut transport = base.unwrap_or_else(|| Arc::new(reqwest::Client::new()));
    for middleware in middlewares.into_iter().rev() {
        transport = middleware(transport);
    }
    transport
}

/// Middleware that sets `name: value` on every outgoing request.
pub fn add_header(name: HeaderName, value: HeaderValue) -> Middleware {
    Box::new(move |inner| Arc::new(HeaderInjector { name, value, inner }))
}

struct HeaderInjector {
    name: HeaderName,
    value: HeaderValue,
    inner: Arc<dyn Transport>,
}

impl Transport for HeaderInjector {
    fn execute(&self, mut request: Request) -> BoxFuture<'_, Result<Response, reqwest::Error>> {
        request
            .headers_mut()
            .insert(self.name.clone(), self.value.clone());
        self.inner.execute(request)
    }
}
