//! smbreach - find and reach SMB servers on the local network
//!
//! Resolves a server address the same way an SMB client built on this crate
//! would, and optionally dials it, so name resolution problems can be told
//! apart from authentication or share problems.

use clap::{Parser, Subcommand};
use smbreach::dns::{ResolutionEngine, ResolverConfig, UnicastBackend};
use smbreach::socket::ConnectJob;
use smbreach::target::{HostSpec, RemotePath};
use smbreach::NetError;
use std::net::IpAddr;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "smbreach")]
#[command(about = "Resolve and reach SMB servers, with LLMNR fallback")]
#[command(version)]
#[command(long_about = r#"
smbreach resolves SMB server addresses using the system resolver, the .local
suffix, and LLMNR multicast queries, in that order, under a single timeout.

Examples:
  smbreach resolve fileserver            # Print addresses for a name
  smbreach probe nas:1445                # Resolve and open a TCP connection
  smbreach --map nas=10.0.0.7 probe nas  # Use a static host entry
  smbreach path '\\share\dir\..\file'    # Show the normalized remote path
"#)]
struct Cli {
    /// Overall timeout in milliseconds
    #[arg(
        long,
        short,
        global = true,
        default_value = "10000",
        env = "SMBREACH_TIMEOUT_MS"
    )]
    timeout: u64,

    /// Use the hickory-dns resolver instead of the system resolver
    #[arg(long, global = true)]
    hickory: bool,

    /// Skip the LLMNR multicast tiers
    #[arg(long, global = true)]
    no_multicast: bool,

    /// Static host entry, NAME=IP (repeatable)
    #[arg(long = "map", global = true, value_parser = parse_mapping)]
    mappings: Vec<(String, IpAddr)>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a server address and print its addresses in dial order
    Resolve {
        /// HOST[:PORT] or [IPV6][:PORT]
        server: String,
    },
    /// Resolve a server address and connect to the first reachable address
    Probe {
        /// HOST[:PORT] or [IPV6][:PORT]
        server: String,
    },
    /// Print the normalized form of remote paths
    Path {
        /// Remote paths in Windows or POSIX form
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn parse_mapping(s: &str) -> Result<(String, IpAddr), String> {
    let (name, ip) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=IP, got {s:?}"))?;
    let ip = ip
        .parse::<IpAddr>()
        .map_err(|e| format!("invalid IP {ip:?}: {e}"))?;
    if name.is_empty() {
        return Err("empty host name".to_string());
    }
    Ok((name.to_string(), ip))
}

fn init_logging(cli: &Cli) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("smbreach={level}")));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn build_config(cli: &Cli) -> ResolverConfig {
    let mut config = ResolverConfig::new()
        .timeout(Duration::from_millis(cli.timeout))
        .multicast_enabled(!cli.no_multicast);
    if cli.hickory {
        config = config.backend(UnicastBackend::Hickory);
    }
    for (name, ip) in &cli.mappings {
        config.overrides.entry(name.clone()).or_default().push(*ip);
    }
    config
}

async fn run(cli: Cli) -> Result<(), NetError> {
    let timeout = Duration::from_millis(cli.timeout);
    let engine = ResolutionEngine::new(build_config(&cli));

    match cli.command {
        Commands::Resolve { server } => {
            let spec = HostSpec::parse(&server)?;
            let addrs = engine.resolve(spec.host(), timeout).await?;
            for addr in addrs {
                println!("{addr}");
            }
        }
        Commands::Probe { server } => {
            let connected = ConnectJob::new(&engine, timeout)
                .connect_address(&server)
                .await?;
            println!(
                "connected to {} ({} candidate{})",
                connected.peer,
                connected.candidates.len(),
                if connected.candidates.len() == 1 { "" } else { "s" }
            );
        }
        Commands::Path { paths } => {
            for path in paths {
                println!("{}", RemotePath::new(&path));
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(code = e.as_i32(), "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
