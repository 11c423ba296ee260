//! Request routing.
//!
//! Routes and middlewares are registered on the [`App`][crate::App] in order;
//! registration order is evaluation order. Middlewares all run before the
//! first matching route, a route match wins and stops the scan.
//!
//! # Patterns
//!
//! A pattern is `/`-separated segments, each either a literal, `*` (matches
//! any single segment) or `:name` (captures the segment as a path
//! parameter). Pattern and path must have the same number of segments, a
//! wildcard never spans several of them.

mod matcher;
mod statics;


pub(crate) use matcher::matches;
pub(crate) use statics::locate;

use std::fmt;

use crate::{http::Method, request::Request, response::Response};

/// A middleware or route handler.
///
/// Implemented for every `Fn(&mut Request, &mut Response)` closure or
/// function, so handlers are usually written inline:
///
/// ```no_run
/// # use loam::{Request, Response};
/// # let mut app = loam::App::new(loam::Config::default()).unwrap();
/// app.get("/ping", |_req: &mut Request, res: &mut Response| res.send("pong"))?;
/// # Ok::<(), loam::Error>(())
/// ```
pub trait Handler: Send + Sync {
    /// Handle a request.
    fn handle(&self, req: &mut Request, res: &mut Response);
}

impl<F> Handler for F
where
    F: Fn(&mut Request, &mut Response) + Send + Sync,
{
    #[inline]
    fn handle(&self, req: &mut Request, res: &mut Response) {
        self(req, res)
    }
}

/// A registered route or middleware entry. Immutable after registration.
pub(crate) struct Route {
    /// `None` matches every method.
    pub(crate) method: Option<Method>,
    pub(crate) pattern: String,
    pub(crate) handler: Box<dyn Handler>,
}

impl Route {
    /// Returns `true` if the entry matches the request, capturing path
    /// parameters into the request on success.
    pub(crate) fn matches(&self, req: &mut Request) -> bool {
        if self.method.is_some_and(|method| method != req.method()) {
            return false;
        }

        // params only ever reflect the current attempt
        let mut params = std::mem::take(&mut req.params);
        let matched = matches(&self.pattern, req.path(), &mut params);
        req.params = params;

        matched
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}
