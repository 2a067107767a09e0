use super::{Name, Resolve, ResolutionBudget};
use crate::base::neterror::NetError;
use std::{net::IpAddr, sync::Arc};

/// Standard name lookup through a [`Resolve`] backend, bounded by a
/// [`ResolutionBudget`].
#[derive(Clone)]
pub struct UnicastResolver {
    inner: Arc<dyn Resolve>,
}

impl UnicastResolver {
    pub fn new(inner: Arc<dyn Resolve>) -> Self {
        Self { inner }
    }

    /// Looks up `hostname`.
    ///
    /// IP literals are returned as-is without calling the backend. An
    /// expired budget fails with [`NetError::Cancelled`] before any I/O,
    /// and a lookup still running at the deadline is abandoned with the
    /// same error. An empty answer is [`NetError::NoAddresses`].
    pub async fn lookup(
        &self,
        budget: &ResolutionBudget,
        hostname: &str,
    ) -> Result<Vec<IpAddr>, NetError> {
        if let Ok(ip) = hostname.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }

        let cancelled = || NetError::Cancelled {
            host: hostname.to_string(),
        };
        if budget.is_expired() {
            return Err(cancelled());
        }

        let lookup = self.inner.resolve(Name::new(hostname));
        let addrs = tokio::time::timeout_at(budget.deadline(), lookup)
            .await
            .map_err(|_| cancelled())??;

        let addrs: Vec<IpAddr> = addrs.collect();
        if addrs.is_empty() {
            return Err(NetError::NoAddresses {
                host: hostname.to_string(),
            });
        }
        Ok(addrs)
    }
}

impl std::fmt::Debug for UnicastResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnicastResolver").finish_non_exhaustive()
    }
}
