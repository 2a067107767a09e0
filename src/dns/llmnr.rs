//! Link-Local Multicast Name Resolution (RFC 4795) client.
//!
//! Small office NAS boxes and Windows hosts often answer for their name only
//! over LLMNR, with no entry in any DNS server. A query is one DNS-format
//! message carrying an A and an AAAA question, sent to the link-scope
//! groups `224.0.0.252` and `ff02::1:3` on port 5355. Any host owning the
//! name replies by unicast to the sender.
//!
//! Replies are collected for the whole window rather than stopping at the
//! first one: several hosts may claim the same name, and the caller
//! deduplicates. A true negative therefore always costs the full window.

use super::{IpSet, MulticastConfig};
use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use hickory_proto::{
    op::{Message, MessageType, OpCode, Query},
    rr::{Name, RData, RecordType},
    ProtoError,
};
use socket2::{Domain, Protocol, Socket, Type};
use std::{
    io,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};
use thiserror::Error;
use tokio::{net::UdpSocket, time::Instant};

/// Why an incoming datagram was not used.
#[derive(Debug, Error)]
enum Discard {
    #[error("malformed message: {0}")]
    Malformed(#[from] ProtoError),
    #[error("not a response")]
    NotAResponse,
    #[error("id mismatch (expected {expected}, got {got})")]
    IdMismatch { expected: u16, got: u16 },
}

/// LLMNR resolver. Each lookup owns its socket for the duration of the call.
#[derive(Debug, Clone, Default)]
pub struct MulticastResolver {
    config: MulticastConfig,
}

impl MulticastResolver {
    pub fn new(config: MulticastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MulticastConfig {
        &self.config
    }

    /// Queries `hostname` and collects A/AAAA answers until `timeout`
    /// elapses.
    ///
    /// A zero `timeout` is raised to the configured minimum. Returns
    /// [`NetError::NoResponses`] if nothing answered in time. A failed IPv6
    /// send is logged and ignored; any other socket failure is returned.
    pub async fn lookup(
        &self,
        hostname: &str,
        timeout: Duration,
    ) -> Result<Vec<IpAddr>, NetError> {
        let timeout = if timeout.is_zero() {
            self.config.min_timeout
        } else {
            timeout
        };

        let id = rand::random::<u16>();
        let query = encode_query(hostname, id)?;

        let socket = bind_query_socket(self.config.bind_addr).await?;
        let local = socket.local_addr().socket_context("bind")?;
        let deadline = Instant::now() + timeout;

        socket
            .send_to(&query, destination(local, self.config.ipv4_group))
            .await
            .socket_context("send")?;
        if let Err(e) = socket
            .send_to(&query, destination(local, self.config.ipv6_group))
            .await
        {
            tracing::warn!(
                group = %self.config.ipv6_group,
                error = %e,
                "IPv6 LLMNR query not sent"
            );
        }
        tracing::debug!(
            host = %hostname,
            id,
            timeout_ms = timeout.as_millis() as u64,
            "LLMNR query sent"
        );

        let mut found = IpSet::new();
        let mut buf = vec![0u8; self.config.max_datagram];
        loop {
            let received = tokio::time::timeout_at(deadline, socket.recv_from(&mut buf)).await;
            let (len, from) = match received {
                Err(_) => break,
                Ok(Err(e)) if is_timeout(&e) => break,
                Ok(Err(e)) => return Err(NetError::socket("recv", e)),
                Ok(Ok(received)) => received,
            };

            match decode_answers(&buf[..len], id) {
                Ok(addrs) => {
                    tracing::debug!(%from, count = addrs.len(), "LLMNR response");
                    found.extend(addrs);
                }
                Err(reason) => {
                    tracing::trace!(%from, %reason, "ignoring datagram");
                }
            }
        }

        if found.is_empty() {
            return Err(NetError::NoResponses {
                host: hostname.to_string(),
            });
        }
        Ok(found.into_vec())
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

/// Binds the query socket.
///
/// The unspecified IPv6 address gets a dual-stack socket with
/// `IPV6_V6ONLY` cleared. If the host cannot open one, the same port is
/// bound on the IPv4 wildcard instead.
async fn bind_query_socket(addr: SocketAddr) -> Result<UdpSocket, NetError> {
    match addr {
        SocketAddr::V6(v6) if v6.ip().is_unspecified() => match bind_dual_stack(addr) {
            Ok(socket) => Ok(socket),
            Err(e) => {
                tracing::warn!(%addr, error = %e, "dual-stack bind failed, using IPv4 only");
                let fallback = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), v6.port());
                UdpSocket::bind(fallback).await.socket_context("bind")
            }
        },
        _ => UdpSocket::bind(addr).await.socket_context("bind"),
    }
}

fn bind_dual_stack(addr: SocketAddr) -> io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV6, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_only_v6(false)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    UdpSocket::from_std(socket.into())
}

/// Addresses `group` from a socket bound at `local`: IPv4 groups become
/// v4-mapped when the socket is IPv6.
fn destination(local: SocketAddr, group: SocketAddr) -> SocketAddr {
    match (local, group) {
        (SocketAddr::V6(_), SocketAddr::V4(v4)) => {
            SocketAddr::new(IpAddr::V6(v4.ip().to_ipv6_mapped()), v4.port())
        }
        _ => group,
    }
}

/// Builds the query message: one A and one AAAA question for the
/// fully-qualified `hostname`, recursion desired cleared.
pub(crate) fn encode_query(hostname: &str, id: u16) -> Result<Vec<u8>, NetError> {
    let invalid = |e: ProtoError| NetError::InvalidName {
        name: hostname.to_string(),
        reason: e.to_string(),
    };

    let fqdn = if hostname.ends_with('.') {
        hostname.to_string()
    } else {
        format!("{hostname}.")
    };
    let name = Name::from_utf8(&fqdn).map_err(invalid)?;

    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(false)
        .add_query(Query::query(name.clone(), RecordType::A))
        .add_query(Query::query(name, RecordType::AAAA));

    message.to_vec().map_err(invalid)
}

/// Extracts A/AAAA answers from a response to query `id`. Authority and
/// additional sections are not consulted.
fn decode_answers(datagram: &[u8], id: u16) -> Result<Vec<IpAddr>, Discard> {
    let message = Message::from_vec(datagram)?;
    if message.message_type() != MessageType::Response {
        return Err(Discard::NotAResponse);
    }
    if message.id() != id {
        return Err(Discard::IdMismatch {
            expected: id,
            got: message.id(),
        });
    }

    Ok(message
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            RData::A(a) => Some(IpAddr::V4(a.0)),
            RData::AAAA(aaaa) => Some(IpAddr::V6(aaaa.0)),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::rr::{
        rdata::{A, AAAA, CNAME},
        Record,
    };
    use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

    fn response_for(query: &[u8]) -> Message {
        let query = Message::from_vec(query).unwrap();
        let mut response = Message::new();
        response
            .set_id(query.id())
            .set_message_type(MessageType::Response)
            .add_queries(query.queries().to_vec());
        response
    }

    #[test]
    fn test_encode_query_shape() {
        let bytes = encode_query("fileserver", 0x1234).unwrap();
        let message = Message::from_vec(&bytes).unwrap();

        assert_eq!(message.id(), 0x1234);
        assert_eq!(message.message_type(), MessageType::Query);
        assert!(!message.recursion_desired());
        assert_eq!(message.queries().len(), 2);
        assert_eq!(message.queries()[0].query_type(), RecordType::A);
        assert_eq!(message.queries()[1].query_type(), RecordType::AAAA);
        for query in message.queries() {
            assert_eq!(query.name().to_string(), "fileserver.");
            assert!(query.name().is_fqdn());
        }
    }

    #[test]
    fn test_encode_query_keeps_existing_dot() {
        let bytes = encode_query("nas.local.", 1).unwrap();
        let message = Message::from_vec(&bytes).unwrap();
        assert_eq!(message.queries()[0].name().to_string(), "nas.local.");
    }

    #[test]
    fn test_encode_query_rejects_bad_name() {
        let long_label = "a".repeat(64);
        let err = encode_query(&long_label, 1).unwrap_err();
        assert!(matches!(err, NetError::InvalidName { .. }));
    }

    #[test]
    fn test_decode_answers_filters_record_types() {
        let query = encode_query("nas", 7).unwrap();
        let name = Name::from_utf8("nas.").unwrap();
        let mut response = response_for(&query);
        response.add_answer(Record::from_rdata(
            name.clone(),
            30,
            RData::A(A(Ipv4Addr::new(192, 168, 1, 20))),
        ));
        response.add_answer(Record::from_rdata(
            name.clone(),
            30,
            RData::CNAME(CNAME(Name::from_utf8("alias.").unwrap())),
        ));
        response.add_answer(Record::from_rdata(
            name.clone(),
            30,
            RData::AAAA(AAAA(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 20))),
        ));
        response.add_additional(Record::from_rdata(
            name,
            30,
            RData::A(A(Ipv4Addr::new(10, 9, 9, 9))),
        ));

        let addrs = decode_answers(&response.to_vec().unwrap(), 7).unwrap();
        assert_eq!(
            addrs,
            vec![
                IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)),
                "fe80::20".parse::<IpAddr>().unwrap(),
            ]
        );
    }

    #[test]
    fn test_decode_discards_unrelated_traffic() {
        let query = encode_query("nas", 7).unwrap();
        assert!(matches!(decode_answers(&query, 7), Err(Discard::NotAResponse)));

        let response = response_for(&query).to_vec().unwrap();
        assert!(matches!(
            decode_answers(&response, 8),
            Err(Discard::IdMismatch { expected: 8, got: 7 })
        ));

        assert!(matches!(
            decode_answers(&[0xde, 0xad], 7),
            Err(Discard::Malformed(_))
        ));
    }

    /// Loopback stand-in for the multicast group.
    async fn responder(answers: Vec<Ipv4Addr>, junk_first: bool) -> SocketAddr {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buf = [0u8; 1500];
            let (len, from) = socket.recv_from(&mut buf).await.unwrap();
            if junk_first {
                socket.send_to(b"not dns at all", from).await.unwrap();
            }
            let mut response = response_for(&buf[..len]);
            let name = response.queries()[0].name().clone();
            for ip in answers {
                response.add_answer(Record::from_rdata(name.clone(), 30, RData::A(A(ip))));
            }
            socket
                .send_to(&response.to_vec().unwrap(), from)
                .await
                .unwrap();
        });
        addr
    }

    fn loopback_config(group: SocketAddr) -> MulticastConfig {
        MulticastConfig::new()
            .ipv4_group(group)
            .bind_addr("127.0.0.1:0".parse().unwrap())
    }

    #[tokio::test]
    async fn test_lookup_collects_until_deadline() {
        let answers = vec![
            Ipv4Addr::new(10, 0, 0, 8),
            Ipv4Addr::new(10, 0, 0, 8),
            Ipv4Addr::new(10, 0, 0, 9),
        ];
        let group = responder(answers, true).await;
        let resolver = MulticastResolver::new(loopback_config(group));

        let addrs = resolver
            .lookup("nas", Duration::from_millis(300))
            .await
            .unwrap();
        assert_eq!(
            addrs,
            vec![
                IpAddr::V4(Ipv4Addr::new(10, 0, 0, 8)),
                IpAddr::V4(Ipv4Addr::new(10, 0, 0, 9)),
            ]
        );
    }

    #[test]
    fn test_destination_maps_ipv4_group_on_ipv6_socket() {
        let v6_local: SocketAddr = "[::]:40000".parse().unwrap();
        let v4_local: SocketAddr = "0.0.0.0:40000".parse().unwrap();
        let v4_group: SocketAddr = "224.0.0.252:5355".parse().unwrap();
        let v6_group: SocketAddr = "[ff02::1:3]:5355".parse().unwrap();

        assert_eq!(
            destination(v6_local, v4_group),
            "[::ffff:224.0.0.252]:5355".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(destination(v6_local, v6_group), v6_group);
        assert_eq!(destination(v4_local, v4_group), v4_group);
    }

    #[tokio::test]
    async fn test_default_bind_sends_to_both_groups() {
        // Hosts without IPv6 cannot exercise the second send.
        let Ok(v6_listener) = UdpSocket::bind("[::1]:0").await else {
            return;
        };
        let v6_group = v6_listener.local_addr().unwrap();
        let v6_received = tokio::spawn(async move {
            let mut buf = [0u8; 1500];
            let received =
                tokio::time::timeout(Duration::from_secs(2), v6_listener.recv_from(&mut buf))
                    .await;
            matches!(received, Ok(Ok(_)))
        });

        let v4_group = responder(vec![Ipv4Addr::new(10, 0, 0, 8)], false).await;
        let config = MulticastConfig::new()
            .ipv4_group(v4_group)
            .ipv6_group(v6_group);
        assert!(config.bind_addr.ip().is_unspecified() && config.bind_addr.is_ipv6());
        let resolver = MulticastResolver::new(config);

        let addrs = resolver
            .lookup("nas", Duration::from_millis(300))
            .await
            .unwrap();
        assert_eq!(addrs, vec![IpAddr::V4(Ipv4Addr::new(10, 0, 0, 8))]);
        assert!(v6_received.await.unwrap(), "IPv6 query was not sent");
    }

    #[tokio::test]
    async fn test_lookup_without_answers() {
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let resolver = MulticastResolver::new(loopback_config(silent.local_addr().unwrap()));

        let started = std::time::Instant::now();
        let err = resolver
            .lookup("nobody", Duration::from_millis(150))
            .await
            .unwrap_err();
        assert!(matches!(err, NetError::NoResponses { ref host } if host == "nobody"));
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_zero_timeout_uses_floor() {
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let config =
            loopback_config(silent.local_addr().unwrap()).min_timeout(Duration::from_millis(100));
        let resolver = MulticastResolver::new(config);

        let started = std::time::Instant::now();
        let err = resolver.lookup("nobody", Duration::ZERO).await.unwrap_err();
        assert!(matches!(err, NetError::NoResponses { .. }));
        assert!(started.elapsed() >= Duration::from_millis(100));
    }
}
