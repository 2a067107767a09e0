//! Tiered host resolution.
//!
//! [`ResolutionEngine::resolve`] turns a host string into an ordered list of
//! addresses worth dialing. IP literals return immediately; names go
//! through a fixed fallback chain, each tier attempted only while nothing
//! has been found and the shared deadline has not passed:
//!
//! 1. unicast lookup of the exact name
//! 2. unicast lookup of `<name>.local`
//! 3. LLMNR query for the exact name
//! 4. LLMNR query for `<name>.local`
//!
//! The `.local` tiers are skipped when the name already carries the suffix.
//! Tiers run one after another, never concurrently: the order is the
//! preference order. An LLMNR tier listens for whatever remains of the
//! deadline, so the suffixed LLMNR tier only runs when the exact one failed
//! early (a socket error, an unencodable name).

use super::{
    GaiResolver, HickoryResolver, IpSet, MulticastResolver, ResolutionBudget, Resolve,
    ResolverConfig, ResolverWithOverrides, UnicastBackend, UnicastResolver,
};
use crate::base::neterror::NetError;
use std::{fmt, net::IpAddr, sync::Arc, time::Duration};

/// Protocol a tier uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Unicast,
    Multicast,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Unicast => f.write_str("unicast"),
            Strategy::Multicast => f.write_str("llmnr"),
        }
    }
}

/// One step of the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    pub strategy: Strategy,
    pub hostname: String,
}

/// Outcome of running one tier.
#[derive(Debug)]
struct Attempt {
    tier: Tier,
    result: Result<Vec<IpAddr>, NetError>,
}

/// Resolves hosts through unicast lookups with LLMNR fallback.
#[derive(Debug, Clone)]
pub struct ResolutionEngine {
    config: ResolverConfig,
    unicast: UnicastResolver,
    multicast: MulticastResolver,
}

impl Default for ResolutionEngine {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl ResolutionEngine {
    /// Builds an engine with the unicast backend named in `config`.
    pub fn new(config: ResolverConfig) -> Self {
        let backend: Arc<dyn Resolve> = match config.backend {
            UnicastBackend::System => Arc::new(GaiResolver::new()),
            UnicastBackend::Hickory => Arc::new(HickoryResolver::new()),
        };
        Self::with_resolver(backend, config)
    }

    /// Builds an engine around a caller-supplied unicast backend.
    pub fn with_resolver(backend: Arc<dyn Resolve>, config: ResolverConfig) -> Self {
        let backend: Arc<dyn Resolve> = if config.overrides.is_empty() {
            backend
        } else {
            Arc::new(ResolverWithOverrides::new(backend, config.overrides.clone()))
        };
        Self {
            unicast: UnicastResolver::new(backend),
            multicast: MulticastResolver::new(config.multicast.clone()),
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The tiers a name goes through, in order.
    pub fn tiers(&self, hostname: &str) -> Vec<Tier> {
        let exact = hostname.to_string();
        let suffixed = self.suffixed(hostname);

        let mut strategies = vec![Strategy::Unicast];
        if self.config.multicast_enabled {
            strategies.push(Strategy::Multicast);
        }

        let mut tiers = Vec::with_capacity(4);
        for strategy in strategies {
            tiers.push(Tier {
                strategy,
                hostname: exact.clone(),
            });
            if let Some(suffixed) = &suffixed {
                tiers.push(Tier {
                    strategy,
                    hostname: suffixed.clone(),
                });
            }
        }
        tiers
    }

    fn suffixed(&self, hostname: &str) -> Option<String> {
        let suffix = &self.config.local_suffix;
        let base = hostname.trim_end_matches('.');
        if suffix.is_empty() || base.is_empty() {
            return None;
        }
        let lower = base.to_ascii_lowercase();
        if lower.ends_with(&suffix.to_ascii_lowercase()) {
            return None;
        }
        Some(format!("{base}{suffix}"))
    }

    /// Resolves `hostname` within `timeout`.
    ///
    /// A zero `timeout` means the configured default. The whole call,
    /// across every tier, finishes by the deadline computed here. Returns a
    /// non-empty, duplicate-free list with the preferred address first, or
    /// [`NetError::ResolutionFailed`] wrapping the most specific cause seen.
    pub async fn resolve(
        &self,
        hostname: &str,
        timeout: Duration,
    ) -> Result<Vec<IpAddr>, NetError> {
        if let Ok(ip) = hostname.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }

        let timeout = if timeout.is_zero() {
            self.config.timeout
        } else {
            timeout
        };
        let budget = ResolutionBudget::new(timeout);
        let tiers = self.tiers(hostname);

        let mut collected = IpSet::new();
        let mut cause: Option<NetError> = None;

        for tier in &tiers {
            if budget.is_expired() {
                tracing::debug!(
                    host = %hostname,
                    tier = %tier.strategy,
                    name = %tier.hostname,
                    "deadline passed, skipping remaining tiers"
                );
                if cause.is_none() {
                    cause = Some(NetError::Cancelled {
                        host: hostname.to_string(),
                    });
                }
                break;
            }

            let attempt = self.attempt(tier.clone(), &budget).await;

            match attempt.result {
                Ok(addrs) => {
                    tracing::debug!(
                        host = %hostname,
                        tier = %attempt.tier.strategy,
                        name = %attempt.tier.hostname,
                        count = addrs.len(),
                        "tier resolved"
                    );
                    collected.extend(addrs);
                    if !collected.is_empty() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        host = %hostname,
                        tier = %attempt.tier.strategy,
                        name = %attempt.tier.hostname,
                        error = %e,
                        code = e.as_i32(),
                        "tier failed"
                    );
                    cause = Some(match cause {
                        Some(previous) if e.is_not_found() && !previous.is_not_found() => previous,
                        _ => e,
                    });
                }
            }
        }

        if !collected.is_empty() {
            return Ok(collected.into_vec());
        }

        let cause = cause.unwrap_or_else(|| NetError::NotFound {
            host: hostname.to_string(),
        });
        Err(NetError::ResolutionFailed {
            host: hostname.to_string(),
            source: Box::new(cause),
        })
    }

    async fn attempt(&self, tier: Tier, budget: &ResolutionBudget) -> Attempt {
        let result = match tier.strategy {
            Strategy::Unicast => self.unicast.lookup(budget, &tier.hostname).await,
            Strategy::Multicast => {
                self.multicast
                    .lookup(&tier.hostname, budget.remaining())
                    .await
            }
        };
        Attempt { tier, result }
    }
}
