//! Small embeddable HTTP/1.x server library.
//!
//! Applications register route handlers, the library owns socket acceptance,
//! request parsing, routing and response transmission. Each connection serves
//! exactly one request-response cycle on a fixed pool of worker threads.
//!
//! ```no_run
//! use loam::{App, Config, Request, Response};
//!
//! fn main() -> Result<(), loam::Error> {
//!     let mut app = App::new(Config::default())?;
//!
//!     app.get("/", |_req: &mut Request, res: &mut Response| {
//!         res.send("hello world");
//!     })?;
//!
//!     app.get("/user/:name", |req: &mut Request, res: &mut Response| {
//!         let name = req.param("name").unwrap_or("stranger").to_owned();
//!         res.send_fmt(format_args!("hello {name}"));
//!     })?;
//!
//!     app.run("0.0.0.0:8080")
//! }
//! ```
#![warn(missing_debug_implementations)]

mod log;

mod codec;
mod limits;
mod parser;
mod pool;
mod server;

pub mod app;
pub mod config;
pub mod error;
pub mod headers;
pub mod http;
pub mod request;
pub mod response;
pub mod routing;

pub use app::{App, StopHandle};
pub use config::Config;
pub use error::Error;
pub use http::{Method, Version};
pub use request::Request;
pub use response::Response;
pub use routing::Handler;
