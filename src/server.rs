//! Socket listener and per-connection dispatch.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::{Duration, Instant};

use socket2::{Domain, Protocol, Socket, Type};

use crate::{
    app::App,
    error::Error,
    log::{debug, info},
    parser,
    pool::ThreadPool,
    request::Request,
    response::Response,
};

/// An accepted client connection.
///
/// Owned exclusively by the worker processing it. The socket closes exactly
/// once, when the connection drops at the end of the work item.
#[derive(Debug)]
pub(crate) struct Connection {
    pub(crate) stream: TcpStream,
    pub(crate) peer: SocketAddr,
}

/// Resolve a `"host:port"` specification into a socket address.
pub(crate) fn resolve(host: &str) -> Result<SocketAddr, Error> {
    let mut addrs = host.to_socket_addrs().map_err(|_| Error::BadHost)?;

    match addrs.next() {
        Some(addr) if addr.port() != 0 => Ok(addr),
        _ => Err(Error::BadHost),
    }
}

/// Create the listening socket.
///
/// Applies `SO_REUSEADDR`, binds and listens with a backlog of the
/// configured max connection count.
pub(crate) fn listen(addr: SocketAddr, backlog: usize) -> Result<TcpListener, Error> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
        .map_err(Error::Socket)?;

    socket.set_reuse_address(true).map_err(Error::SocketOpt)?;
    socket.bind(&addr.into()).map_err(Error::Bind)?;
    socket
        .listen(i32::try_from(backlog).unwrap_or(i32::MAX))
        .map_err(Error::Listen)?;

    Ok(socket.into())
}

/// Apply per-connection socket options: disable Nagle's algorithm, set the
/// configured receive/send timeout and make sure the socket is blocking.
fn set_opts(stream: &TcpStream, timeout: u64) -> io::Result<()> {
    stream.set_nodelay(true)?;

    if timeout > 0 {
        let timeout = Some(Duration::from_secs(timeout));
        stream.set_read_timeout(timeout)?;
        stream.set_write_timeout(timeout)?;
    }

    stream.set_nonblocking(false)
}

/// Accept loop, one pool work item per connection.
///
/// Ends gracefully when the application is stopped or interrupted; any other
/// accept failure is fatal for the run call.
pub(crate) fn serve(app: Arc<App>, listener: TcpListener, pool: &ThreadPool) -> Result<(), Error> {
    while app.running() && !signal::interrupted() {
        let (stream, peer) = match listener.accept() {
            Ok(accepted) => accepted,
            // interrupted accept: re-check the flags
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(Error::Accept(err)),
        };

        debug!("new connection from {peer}");

        set_opts(&stream, app.config().tcp_timeout).map_err(Error::SocketOpt)?;

        let app = Arc::clone(&app);
        pool.submit(move || handle(app, Connection { stream, peer }))?;
    }

    debug!("stopping the connection handler");
    Ok(())
}

/// Run one connection's parse -> route -> respond cycle to completion.
fn handle(app: Arc<App>, mut conn: Connection) {
    let peer = conn.peer;
    let config = app.config();

    let mut res = Response::new(config);
    let start = Instant::now();
    let mut summary = None;

    {
        let mut req = Request::new(&mut conn.stream, peer);

        match parser::parse(&mut req) {
            Ok(()) => {
                res.set_version(req.version());
                app.dispatch(&mut req, &mut res);
                summary = Some((req.method(), std::mem::take(&mut req.path)));
            }
            Err(err) => {
                debug!("received an invalid request from {peer}: {err}");

                // the transport died, there is nobody left to answer
                if !err.is_protocol() {
                    return;
                }

                res.set_status(400);
            }
        }
    }

    if let Err(err) = res.end(&mut conn.stream) {
        debug!("failed to send the response to {peer}: {err}");
        return;
    }

    if let Some((method, path)) = summary {
        if !config.disable_logging {
            let elapsed = start.elapsed().as_micros();
            info!("{} {method} {path} {elapsed}µs", res.status());
        }
    }
}

#[cfg(test)]
mod test {
    use super::resolve;
    use crate::Error;

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("127.0.0.1:8080").unwrap().port(), 8080);
        assert_eq!(resolve("[::1]:8080").unwrap().port(), 8080);

        // port is required and must be in [1, 65535]
        assert!(matches!(resolve("127.0.0.1"), Err(Error::BadHost)));
        assert!(matches!(resolve("127.0.0.1:0"), Err(Error::BadHost)));
        assert!(matches!(resolve("127.0.0.1:70000"), Err(Error::BadHost)));
    }
}

pub(crate) mod signal {
    //! Process-wide interrupt flag.
    //!
    //! The handler only flips a static flag, it holds no reference to any
    //! application; every accept loop polls the flag next to its own stop
    //! flag, so several independent servers can coexist in one process.

    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::error::Error;

    static INTERRUPTED: AtomicBool = AtomicBool::new(false);

    /// Returns `true` once SIGINT was received.
    pub(crate) fn interrupted() -> bool {
        INTERRUPTED.load(Ordering::Relaxed)
    }

    extern "C" fn on_interrupt(_: libc::c_int) {
        INTERRUPTED.store(true, Ordering::Relaxed);
    }

    /// Install the SIGINT handler.
    ///
    /// Installed without `SA_RESTART`, so a blocked `accept` wakes up with
    /// `EINTR` and the loop observes the flag.
    pub(crate) fn install() -> Result<(), Error> {
        INTERRUPTED.store(false, Ordering::Relaxed);

        unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            action.sa_sigaction = on_interrupt as libc::sighandler_t;
            libc::sigemptyset(&mut action.sa_mask);
            action.sa_flags = 0;

            if libc::sigaction(libc::SIGINT, &action, std::ptr::null_mut()) != 0 {
                return Err(Error::Signal(io::Error::last_os_error()));
            }
        }

        Ok(())
    }
}
