//! Server configuration.

/// Configuration applied at [`App`][crate::App] construction.
///
/// All fields have working defaults:
///
/// ```
/// use loam::Config;
///
/// let config = Config { pool_size: 4, ..Config::default() };
/// assert_eq!(config.max_connections, 1000);
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// Max parallel connection count, used as the listen backlog.
    pub max_connections: usize,
    /// Worker thread count.
    pub pool_size: usize,
    /// TCP receive/send timeout in seconds, `0` disables the timeout.
    pub tcp_timeout: u64,
    /// Disables the request log and the startup banner.
    pub disable_logging: bool,
    /// Installs a SIGINT handler that stops [`App::run`][crate::App::run].
    pub handle_signal: bool,
    /// Sends the `Server` header in every response.
    pub server_header: bool,
    /// Serializes route dispatch behind a single lock, so only one handler
    /// runs at a time. Trades concurrency for a single-writer model when
    /// handlers mutate shared application state.
    pub lock_request: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_connections: 1000,
            pool_size: 30,
            tcp_timeout: 10,
            disable_logging: false,
            handle_signal: true,
            server_header: true,
            lock_request: true,
        }
    }
}
