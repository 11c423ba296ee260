//! Application setup and the run loop.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::{
    config::Config,
    error::Error,
    http::Method,
    log::{debug, info, warning},
    pool::ThreadPool,
    request::Request,
    response::Response,
    routing::{self, Handler, Route},
    server,
};

/// The web application.
///
/// Owns the configuration, the ordered route and middleware registries, the
/// static mapping, the application locals and the worker pool, for one
/// [`run`][App::run] cycle. Registration happens before `run`; the
/// registries are read-only while serving.
pub struct App {
    config: Config,
    middlewares: Vec<Route>,
    routes: Vec<Route>,
    statics: Option<(String, PathBuf)>,
    fallback: Box<dyn Handler>,
    locals: Vec<(String, String)>,
    running: Arc<AtomicBool>,
    lock: Option<Mutex<()>>,
}

/// The default fallback handler.
fn not_found(_req: &mut Request, res: &mut Response) {
    res.set_status(404);
    res.set("Content-Type", "text/plain; charset=utf-8");
    res.send("not found");
}

macro_rules! route_sugar {
    ($($(#[$doc:meta])* $name:ident => $method:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name<H: Handler + 'static>(
                &mut self,
                path: impl Into<String>,
                handler: H,
            ) -> Result<(), Error> {
                self.route(Method::$method, path, handler)
            }
        )*
    };
}

impl App {
    /// Create a new application.
    ///
    /// Fails on an invalid configuration: a zero worker count or a zero max
    /// connection count.
    pub fn new(config: Config) -> Result<Self, Error> {
        if config.max_connections == 0 {
            return Err(Error::BadMaxConnCount);
        }
        if config.pool_size == 0 {
            return Err(Error::BadPoolSize);
        }

        let lock = config.lock_request.then(|| Mutex::new(()));

        Ok(Self {
            config,
            middlewares: Vec::new(),
            routes: Vec::new(),
            statics: None,
            fallback: Box::new(not_found),
            locals: Vec::new(),
            running: Arc::new(AtomicBool::new(false)),
            lock,
        })
    }

    /// Application configuration.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns `true` while [`run`][App::run] is serving.
    #[inline]
    pub fn running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    // ===== Registration =====

    /// Register a route for `method`.
    ///
    /// Routes are evaluated in registration order, the first match wins.
    pub fn route<H: Handler + 'static>(
        &mut self,
        method: Method,
        path: impl Into<String>,
        handler: H,
    ) -> Result<(), Error> {
        self.add(Some(method), false, path.into(), Box::new(handler))
    }

    /// Register a route matching every method.
    pub fn any<H: Handler + 'static>(
        &mut self,
        path: impl Into<String>,
        handler: H,
    ) -> Result<(), Error> {
        self.add(None, false, path.into(), Box::new(handler))
    }

    route_sugar! {
        /// Register a GET route.
        get => Get;
        /// Register a HEAD route.
        head => Head;
        /// Register a POST route.
        post => Post;
        /// Register a PUT route.
        put => Put;
        /// Register a DELETE route.
        delete => Delete;
        /// Register an OPTIONS route.
        options => Options;
    }

    /// Register a middleware matching every method.
    ///
    /// Middlewares run before routes, in registration order, every matching
    /// one. A middleware can [cancel][Request::cancel] the request to skip
    /// everything after itself.
    pub fn middleware<H: Handler + 'static>(
        &mut self,
        path: impl Into<String>,
        handler: H,
    ) -> Result<(), Error> {
        self.add(None, true, path.into(), Box::new(handler))
    }

    /// Register a middleware for a single method.
    pub fn middleware_for<H: Handler + 'static>(
        &mut self,
        method: Method,
        path: impl Into<String>,
        handler: H,
    ) -> Result<(), Error> {
        self.add(Some(method), true, path.into(), Box::new(handler))
    }

    fn add(
        &mut self,
        method: Option<Method>,
        is_middleware: bool,
        pattern: String,
        handler: Box<dyn Handler>,
    ) -> Result<(), Error> {
        if !pattern.starts_with('/') {
            return Err(Error::BadPath);
        }

        let route = Route { method, pattern, handler };

        match is_middleware {
            true => self.middlewares.push(route),
            false => self.routes.push(route),
        }

        Ok(())
    }

    /// Register the fallback handler invoked for unhandled requests.
    ///
    /// The default fallback answers `404` with a plain-text body.
    pub fn fallback<H: Handler + 'static>(&mut self, handler: H) {
        self.fallback = Box::new(handler);
    }

    /// Serve files from `dir` for unrouted GET requests under `prefix`.
    pub fn static_dir(
        &mut self,
        prefix: impl Into<String>,
        dir: impl Into<PathBuf>,
    ) -> Result<(), Error> {
        let prefix = prefix.into();

        if !prefix.starts_with('/') {
            return Err(Error::BadPath);
        }

        self.statics = Some((prefix, dir.into()));
        Ok(())
    }

    /// Register an application local, copied into every request.
    pub fn local(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.locals.iter_mut().find(|(key, _)| *key == name) {
            Some(local) => local.1 = value,
            None => self.locals.push((name, value)),
        }
    }

    // ===== Serving =====

    /// Returns a handle that stops a running application from any thread.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle { running: Arc::clone(&self.running) }
    }

    /// Run the application on `host`, e.g. `"0.0.0.0:8080"`.
    ///
    /// Blocks until [stopped][StopHandle] or interrupted, serving each
    /// accepted connection on the worker pool. Configuration, socket and
    /// pool failures are fatal and returned; per-connection failures are
    /// not.
    pub fn run(self, host: &str) -> Result<(), Error> {
        let addr = server::resolve(host)?;

        if self.config.tcp_timeout == 0 {
            warning!("TCP timeout is disabled, slow peers can occupy workers forever");
        }

        let listener = server::listen(addr, self.config.max_connections)?;

        if self.config.handle_signal {
            server::signal::install()?;
        }

        let mut pool = ThreadPool::new(self.config.pool_size)?;

        if !self.config.disable_logging {
            info!(
                "loam {} listening on {host} with {} workers",
                env!("CARGO_PKG_VERSION"),
                self.config.pool_size,
            );
        }

        self.running.store(true, Ordering::Release);

        let app = Arc::new(self);
        let served = server::serve(Arc::clone(&app), listener, &pool);

        app.running.store(false, Ordering::Release);
        pool.stop();

        served
    }

    // ===== Dispatch =====

    /// Route one parsed request.
    ///
    /// Copies the application locals into the request, runs every matching
    /// middleware until one cancels, then the first matching route, then the
    /// static mapping, then the fallback handler.
    pub(crate) fn dispatch(&self, req: &mut Request, res: &mut Response) {
        let _guard = self
            .lock
            .as_ref()
            .map(|lock| lock.lock().unwrap_or_else(|err| err.into_inner()));

        req.locals = self.locals.clone();

        for middleware in &self.middlewares {
            if req.cancelled() {
                break;
            }
            if middleware.matches(req) {
                middleware.handler.handle(req, res);
            }
        }

        if req.cancelled() {
            return;
        }

        for route in &self.routes {
            if route.matches(req) {
                return route.handler.handle(req, res);
            }
        }

        if let Some((prefix, dir)) = &self.statics {
            if req.method() == Method::Get {
                if let Some(file) = routing::locate(prefix, dir, req.path()) {
                    match res.sendfile(&file) {
                        Ok(()) => return res.set_status(200),
                        Err(err) => {
                            debug!("cannot serve {}: {err}", file.display());
                        }
                    }
                }
            }
        }

        self.fallback.handle(req, res);
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("middlewares", &self.middlewares)
            .field("routes", &self.routes)
            .field("statics", &self.statics)
            .field("locals", &self.locals)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

/// Stops a running [`App`] from any thread.
///
/// Flips the running flag; the accept loop observes it at its next wakeup.
/// The listening socket is not force-closed, so a fully idle loop exits on
/// the next connection or interrupt.
#[derive(Clone, Debug)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    /// Request the application to stop.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;
    use std::sync::Mutex;

    fn app() -> App {
        App::new(Config {
            disable_logging: true,
            ..Config::default()
        })
        .unwrap()
    }

    /// Parse `input`, dispatch it and serialize the response.
    fn dispatch(app: &App, input: &[u8]) -> (u16, String) {
        let peer = "127.0.0.1:9000".parse().unwrap();
        let mut io = Cursor::new(input.to_vec());
        let mut req = Request::new(&mut io, peer);

        crate::parser::parse(&mut req).unwrap();

        let mut res = Response::new(app.config());
        app.dispatch(&mut req, &mut res);

        let mut wire = Vec::new();
        res.end(&mut wire).unwrap();

        (res.status(), String::from_utf8_lossy(&wire).into_owned())
    }

    #[test]
    fn test_dispatch_first_match_wins() {
        let mut app = app();
        app.get("/a", |_req: &mut Request, res: &mut Response| res.send("first")).unwrap();
        app.get("/a", |_req: &mut Request, res: &mut Response| res.send("second")).unwrap();
        app.any("/a", |_req: &mut Request, res: &mut Response| res.send("third")).unwrap();

        let (status, wire) = dispatch(&app, b"GET /a HTTP/1.1\r\n\r\n");
        assert_eq!(status, 200);
        assert!(wire.ends_with("first"));
    }

    #[test]
    fn test_dispatch_method_filter() {
        let mut app = app();
        app.get("/a", |_req: &mut Request, res: &mut Response| res.send("get")).unwrap();
        app.post("/a", |_req: &mut Request, res: &mut Response| res.send("post")).unwrap();

        let (_, wire) = dispatch(&app, b"DELETE /a HTTP/1.1\r\ncontent-length: 1\r\n\r\nx");
        assert!(wire.ends_with("not found"));

        let (_, wire) = dispatch(&app, b"GET /a HTTP/1.1\r\n\r\n");
        assert!(wire.ends_with("get"));
    }

    #[test]
    fn test_dispatch_params() {
        let mut app = app();
        app.get("/user/:id", |req: &mut Request, res: &mut Response| {
            let id = req.param("id").unwrap_or("none").to_owned();
            res.send(id);
        })
        .unwrap();

        let (status, wire) = dispatch(&app, b"GET /user/42 HTTP/1.1\r\n\r\n");
        assert_eq!(status, 200);
        assert!(wire.ends_with("42"));

        // segment count mismatch falls back to 404
        let (status, _) = dispatch(&app, b"GET /user HTTP/1.1\r\n\r\n");
        assert_eq!(status, 404);
        let (status, _) = dispatch(&app, b"GET /user/42/x HTTP/1.1\r\n\r\n");
        assert_eq!(status, 404);
    }

    #[test]
    fn test_dispatch_middleware_cancel() {
        let reached = Arc::new(Mutex::new(Vec::<&'static str>::new()));

        let mut app = app();

        let log = Arc::clone(&reached);
        app.middleware("/*", move |req: &mut Request, res: &mut Response| {
            log.lock().unwrap().push("first");
            res.set_status(401);
            res.send("denied");
            req.cancel();
        })
        .unwrap();

        let log = Arc::clone(&reached);
        app.middleware("/*", move |_req: &mut Request, _res: &mut Response| {
            log.lock().unwrap().push("second");
        })
        .unwrap();

        let log = Arc::clone(&reached);
        app.get("/", move |_req: &mut Request, _res: &mut Response| {
            log.lock().unwrap().push("route");
        })
        .unwrap();

        let (status, wire) = dispatch(&app, b"GET / HTTP/1.1\r\n\r\n");

        // the cancelling middleware's response is preserved
        assert_eq!(status, 401);
        assert!(wire.ends_with("denied"));
        assert_eq!(*reached.lock().unwrap(), ["first"]);
    }

    #[test]
    fn test_dispatch_locals() {
        let mut app = app();
        app.local("name", "app");

        app.middleware("/*", |req: &mut Request, _res: &mut Response| {
            req.set_local("from", "middleware");
        })
        .unwrap();

        app.get("/", |req: &mut Request, res: &mut Response| {
            let name = req.local("name").unwrap_or("?").to_owned();
            let from = req.local("from").unwrap_or("?").to_owned();
            res.send_fmt(format_args!("{name}/{from}"));
        })
        .unwrap();

        let (_, wire) = dispatch(&app, b"GET / HTTP/1.1\r\n\r\n");
        assert!(wire.ends_with("app/middleware"));
    }

    #[test]
    fn test_dispatch_fallback() {
        let (status, wire) = dispatch(&app(), b"GET /missing HTTP/1.1\r\n\r\n");
        assert_eq!(status, 404);
        assert!(wire.ends_with("not found"));

        let mut app = app();
        app.fallback(|_req: &mut Request, res: &mut Response| {
            res.set_status(410);
            res.send("gone");
        });

        let (status, wire) = dispatch(&app, b"GET /missing HTTP/1.1\r\n\r\n");
        assert_eq!(status, 410);
        assert!(wire.ends_with("gone"));
    }

    #[test]
    fn test_dispatch_static_files() {
        let dir = std::env::temp_dir().join(format!("loam-static-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("page.html"), "<h1>hi</h1>").unwrap();

        let mut app = app();
        app.static_dir("/public", &dir).unwrap();

        let (status, wire) = dispatch(&app, b"GET /public/page.html HTTP/1.1\r\n\r\n");
        assert_eq!(status, 200);
        assert!(wire.contains("Content-Type: text/html; charset=utf-8\r\n"));
        assert!(wire.ends_with("<h1>hi</h1>"));

        // missing file and traversal attempts fall through to the fallback
        let (status, _) = dispatch(&app, b"GET /public/missing.html HTTP/1.1\r\n\r\n");
        assert_eq!(status, 404);
        let (status, _) = dispatch(&app, b"GET /public/../page.html HTTP/1.1\r\n\r\n");
        assert_eq!(status, 404);

        // only GET is served statically
        let (status, _) =
            dispatch(&app, b"DELETE /public/page.html HTTP/1.1\r\ncontent-length: 1\r\n\r\nx");
        assert_eq!(status, 404);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = Config { pool_size: 0, ..Config::default() };
        assert!(matches!(App::new(config), Err(Error::BadPoolSize)));

        let config = Config { max_connections: 0, ..Config::default() };
        assert!(matches!(App::new(config), Err(Error::BadMaxConnCount)));
    }

    #[test]
    fn test_registration_rejects_bad_path() {
        let mut app = app();
        let registered = app.get("no-slash", |_req: &mut Request, _res: &mut Response| {});
        assert!(matches!(registered, Err(Error::BadPath)));
        assert!(matches!(app.static_dir("no-slash", "/tmp"), Err(Error::BadPath)));
    }
}
