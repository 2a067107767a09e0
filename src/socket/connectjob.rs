use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::dns::{ResolutionBudget, ResolutionEngine};
use crate::target::HostSpec;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;

/// A connected transport, ready to hand to the SMB session layer.
#[derive(Debug)]
pub struct Connected {
    pub stream: TcpStream,
    /// The address that accepted the connection.
    pub peer: SocketAddr,
    /// Every address resolution produced, in dial order.
    pub candidates: Vec<IpAddr>,
}

/// Manages the connection process: parse -> resolve -> TCP.
///
/// Resolution and dialing share one `timeout`; addresses are tried in the
/// order the engine returned them and the first to accept wins.
pub struct ConnectJob<'a> {
    engine: &'a ResolutionEngine,
    timeout: Duration,
}

impl<'a> ConnectJob<'a> {
    pub fn new(engine: &'a ResolutionEngine, timeout: Duration) -> Self {
        Self { engine, timeout }
    }

    /// Connects to a raw server address such as `nas`, `nas:1445` or `[fe80::2]`.
    pub async fn connect_address(&self, address: &str) -> Result<Connected, NetError> {
        let spec = HostSpec::parse(address)?;
        self.connect(&spec).await
    }

    pub async fn connect(&self, spec: &HostSpec) -> Result<Connected, NetError> {
        let budget = ResolutionBudget::new(self.timeout);
        let candidates = self.engine.resolve(spec.host(), self.timeout).await?;

        let mut last_err = None;
        for ip in &candidates {
            let peer = SocketAddr::new(*ip, spec.port());
            tracing::debug!(host = %spec.host(), %peer, "dialing");

            let dial = tokio::time::timeout_at(budget.deadline(), TcpStream::connect(peer)).await;
            match dial.map(|r| r.connection_context(&peer.ip().to_string(), spec.port())) {
                Ok(Ok(stream)) => {
                    tracing::debug!(host = %spec.host(), %peer, "connected");
                    return Ok(Connected {
                        stream,
                        peer,
                        candidates,
                    });
                }
                Ok(Err(err)) => {
                    tracing::debug!(%peer, error = %err, "dial failed");
                    last_err = Some(err);
                }
                Err(_) => {
                    return Err(NetError::ConnectionTimedOut {
                        host: spec.host().to_string(),
                        port: spec.port(),
                    });
                }
            }
        }

        Err(last_err.unwrap_or(NetError::NotFound {
            host: spec.host().to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::ResolverConfig;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connect_literal_address() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let engine = ResolutionEngine::new(ResolverConfig::default());

        let job = ConnectJob::new(&engine, Duration::from_secs(2));
        let connected = job
            .connect_address(&format!("127.0.0.1:{port}"))
            .await
            .unwrap();

        assert_eq!(connected.peer, listener.local_addr().unwrap());
        assert_eq!(connected.candidates, vec!["127.0.0.1".parse::<IpAddr>().unwrap()]);
    }

    #[tokio::test]
    async fn test_connect_falls_through_to_next_address() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        // Nothing listens on the IPv6 loopback port, so the first dial fails.
        let addrs = vec!["::1".parse().unwrap(), "127.0.0.1".parse().unwrap()];
        let engine = ResolutionEngine::new(ResolverConfig::default().host_override("nas", addrs));

        let job = ConnectJob::new(&engine, Duration::from_secs(2));
        let connected = job.connect_address(&format!("nas:{port}")).await.unwrap();

        assert_eq!(connected.peer.ip(), "127.0.0.1".parse::<IpAddr>().unwrap());
        assert_eq!(connected.candidates.len(), 2);
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let engine = ResolutionEngine::new(ResolverConfig::default());
        let job = ConnectJob::new(&engine, Duration::from_secs(2));
        let err = job
            .connect_address(&format!("127.0.0.1:{port}"))
            .await
            .unwrap_err();

        match err {
            NetError::ConnectionFailedTo { host, port: p, .. } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(p, port);
            }
            other => panic!("expected ConnectionFailedTo, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bad_address() {
        let engine = ResolutionEngine::default();
        let job = ConnectJob::new(&engine, Duration::from_secs(1));
        assert!(matches!(
            job.connect_address("").await,
            Err(NetError::EmptyAddress)
        ));
    }
}
