use may_minihttp::{HttpServerWithHeaders, HttpService};
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;
use tracing::info;

use crate::config::RuntimeConfig;

/// Server wrapper binding a service to the `may` runtime.
///
/// Applies the [`RuntimeConfig`] coroutine stack size before accepting
/// connections, then delegates to `may_minihttp` with 32 max headers so
/// proxy- and gateway-decorated traffic fits.
pub struct HttpServer<T> {
    service: T,
    runtime: RuntimeConfig,
}

/// Handle to a running server: its bound address and the accept coroutine.
pub struct ServerHandle {
    addr: SocketAddr,
    handle: may::coroutine::JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until the server accepts TCP connections.
    ///
    /// Polls the bound address; tests use this to avoid racing the accept
    /// loop.
    ///
    /// # Errors
    ///
    /// `TimedOut` when the server is not ready within ~250ms.
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Stop the server, cancelling the accept coroutine and waiting for it.
    pub fn stop(self) {
        // SAFETY: cancel() is marked unsafe by the may runtime. We hold the
        // handle and cancellation is the intended shutdown behavior.
        unsafe {
            self.handle.coroutine().cancel();
        }
        let _ = self.handle.join();
    }

    /// Block until the server coroutine finishes on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the server coroutine panicked.
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}

impl<T: HttpService + Clone + Send + Sync + 'static> HttpServer<T> {
    /// Wrap `service` with the runtime configuration from the environment.
    pub fn new(service: T) -> Self {
        Self {
            service,
            runtime: RuntimeConfig::from_env(),
        }
    }

    /// Wrap `service` with an explicit runtime configuration.
    pub fn with_runtime(service: T, runtime: RuntimeConfig) -> Self {
        Self { service, runtime }
    }

    /// Bind `addr` and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or the port cannot be
    /// bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        may::config().set_stack_size(self.runtime.stack_size);
        info!(
            addr = %addr,
            stack_size = self.runtime.stack_size,
            "Starting HTTP server"
        );
        let handle = HttpServerWithHeaders::<_, 32>(self.service).start(addr)?;
        Ok(ServerHandle { addr, handle })
    }
}
