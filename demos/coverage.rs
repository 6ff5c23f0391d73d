use clap::Parser;
use sre_monitor::{Config, IpVersion, Monitor, Prefix};
use tracing::Level;

#[derive(Parser)]
#[command(about = "Derive the covering set for a list of prefixes")]
struct Cli {
    /// Prefixes to load, e.g. 10.0.0.0/8 10.64.0.0/16 2001:db8::/32
    #[arg(required = true)]
    prefixes: Vec<String>,
    /// IPv4 target prefix length
    #[arg(long, default_value_t = 24)]
    target4: u8,
    /// IPv6 target prefix length
    #[arg(long, default_value_t = 40)]
    target6: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let cli = Cli::parse();

    let mut monitor = Monitor::new(Config {
        target_prefix_len4: cli.target4,
        target_prefix_len6: cli.target6,
    })?;

    for raw in &cli.prefixes {
        let prefix: Prefix = raw.parse()?;
        monitor.add(prefix)?;
    }

    for version in [IpVersion::V4, IpVersion::V6] {
        if monitor.prefix_count(version) == 0 {
            continue;
        }

        println!(
            "{} covering set at /{}:",
            version,
            monitor.target_prefix_len(version)
        );
        for entry in monitor.entries(version)? {
            println!("  {}", entry);
        }
        println!("  total: {} subnets", monitor.total_count(version)?);
    }

    Ok(())
}
