//! Shared harness: runs a prepared gateway on an ephemeral port.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;

use qotd_gateway::config::QotdConfig;
use qotd_gateway::domain::NotificationHub;
use qotd_gateway::server::Gateway;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A gateway serving on `127.0.0.1` until [`TestServer::shutdown`] is called.
pub struct TestServer {
    pub addr: SocketAddr,
    pub hub: NotificationHub,
    stop: Option<oneshot::Sender<()>>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(QotdConfig::default()).await
    }

    pub async fn start_with(config: QotdConfig) -> Self {
        let Ok(gateway) = Gateway::prepare(&config).await else {
            panic!("gateway setup failed");
        };
        let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };

        let hub = gateway.state().hub.clone();
        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(gateway.serve(listener, async move {
            let _ = stopped.await;
        }));

        Self {
            addr,
            hub,
            stop: Some(stop),
            handle,
        }
    }

    pub fn http(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn ws(&self, path: &str) -> String {
        format!("ws://{}{path}", self.addr)
    }

    /// Signals shutdown and waits for the serve loop to return.
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let joined = tokio::time::timeout(std::time::Duration::from_secs(10), self.handle).await;
        assert!(matches!(joined, Ok(Ok(Ok(())))), "server did not stop cleanly");
    }
}
