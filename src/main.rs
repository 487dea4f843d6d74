use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use radar_adapters::arvan::RadarAdapter;
use radar_types::Service;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use radar_notif::{
    ConsoleNotifier, DesktopNotifier, Monitor, NotifierGroup, Settings, SettingsOverrides,
};

#[derive(Parser, Debug)]
#[command(name = "radar-notif")]
#[command(about = "Notify when a service becomes unreachable from Iranian datacenters, per Arvan Cloud Radar")]
#[command(version)]
struct Args {
    /// Service name to monitor (e.g. google, github, etc.)
    #[arg(short, long)]
    service: Option<String>,

    /// Show list of available services
    #[arg(long)]
    services: bool,

    /// Delay between checks in minutes
    #[arg(short, long)]
    delay: Option<u64>,

    /// Disable desktop notifications (console only)
    #[arg(long)]
    no_desktop: bool,

    /// Consecutive failed checks before an outage is reported
    #[arg(short, long)]
    threshold: Option<u32>,

    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            config_file: self.config.clone(),
            service: self.service.clone(),
            delay_minutes: self.delay,
            desktop_notifications: self.no_desktop.then_some(false),
            outage_threshold: self.threshold,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.services {
        print_services();
        return Ok(());
    }

    let settings = match Settings::load(&args.overrides()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}\n", e);
            Args::command().print_help()?;
            std::process::exit(1);
        }
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(settings))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Print available services
fn print_services() {
    println!("Available services:");
    for service in Service::ALL {
        println!("  - {}", service);
    }
}

async fn run(settings: Settings) -> Result<()> {
    let fetcher = RadarAdapter::builder()
        .base_url(settings.base_url.clone())
        .timeout(settings.fetch_timeout)
        .build()?;

    let mut notifiers = NotifierGroup::new().with(ConsoleNotifier::new());
    if settings.desktop_notifications {
        notifiers.push(DesktopNotifier::new(
            settings.app_name.clone(),
            settings.icon_path.clone(),
        ));
    }

    let monitor = Monitor::builder(settings.service, fetcher)
        .notifier(notifiers)
        .datacenters(settings.datacenters.clone())
        .policy(settings.policy)
        .interval(settings.delay)
        .fetch_timeout(settings.fetch_timeout)
        .align_to_minute(settings.align_to_minute)
        .build();

    println!("📡 {}", settings.app_name);
    println!("✅ Monitoring service: {}\n", settings.service.display_name());

    monitor
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Cannot listen for Ctrl-C; running until killed");
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}
