mod console;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{self, Instant};
use tracing::{info, warn};

use skiff_helm::{doctor as helm_doctor, CameraButton, Dispatcher, HelmConfig, Intent};
use skiff_link::{doctor as link_doctor, endpoint_url, FrameSink, Link, LinkConfig, LinkEvent, LinkHandle, WsConnector};
use skiff_proto::PRESETS;
use skiff_view::{doctor as view_doctor, MapConfig, Projector, SampleRegistry, SamplesConfig, Station};

use console::{ConsoleCmd, ConsoleSurface, SamplesCmd};

#[derive(Debug, Parser)]
#[command(name = "skiff", version, about = "skiff - vessel telemetry and command console")]
struct Cli {
    #[arg(long)]
    config: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate the configuration.
    Doctor,
    /// Connect to the vessel and read console commands from stdin.
    Run,
    /// Try one connection and report the link state.
    Status,
}

#[derive(Debug, serde::Deserialize)]
struct Config {
    link: LinkCfg,
    #[serde(default)]
    helm: HelmConfig,
    #[serde(default)]
    samples: SamplesConfig,
    #[serde(default)]
    map: MapConfig,
}

#[derive(Debug, serde::Deserialize)]
struct LinkCfg {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_reconnect_ms")]
    reconnect_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    connect_timeout_ms: u64,
}

fn default_host() -> String {
    "10.35.254.6".into()
}
fn default_port() -> u16 {
    8000
}
fn default_reconnect_ms() -> u64 {
    3000
}
fn default_connect_timeout_ms() -> u64 {
    10_000
}

impl LinkCfg {
    fn link_config(&self) -> LinkConfig {
        LinkConfig {
            reconnect_every: Duration::from_millis(self.reconnect_ms),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            ..LinkConfig::new(endpoint_url(&self.host, self.port))
        }
    }
}

fn load_config(path: &str) -> Result<Config> {
    let s = std::fs::read_to_string(path).context("read config")?;
    toml::from_str(&s).context("parse config toml")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = load_config(&cli.config)?;

    match cli.cmd {
        Command::Doctor => doctor(&cfg)?,
        Command::Run => run(&cfg).await?,
        Command::Status => status(&cfg).await?,
    }
    Ok(())
}

fn doctor(cfg: &Config) -> Result<()> {
    info!("doctor: starting");
    link_doctor::check_endpoint(&cfg.link.host, cfg.link.port, cfg.link.reconnect_ms)?;
    anyhow::ensure!(cfg.link.connect_timeout_ms >= 1000, "link.connect_timeout_ms too small; use >= 1000ms");
    helm_doctor::check_helm(&cfg.helm)?;
    view_doctor::check_view(&cfg.map, &cfg.samples)?;
    info!("doctor: endpoint {}", endpoint_url(&cfg.link.host, cfg.link.port));
    info!("doctor: OK");
    Ok(())
}

async fn status(cfg: &Config) -> Result<()> {
    let link_cfg = cfg.link.link_config();
    let wait = link_cfg.connect_timeout + Duration::from_secs(1);
    let (link, handle, mut events) = Link::new(WsConnector, link_cfg);
    tokio::spawn(link.run());

    // first connectivity report settles the outcome of the first attempt
    let first = time::timeout(wait, async {
        while let Some(ev) = events.recv().await {
            if let LinkEvent::Connectivity(up) = ev {
                return up;
            }
        }
        false
    })
    .await
    .unwrap_or(false);

    let st = handle.status();
    println!("endpoint={}", endpoint_url(&cfg.link.host, cfg.link.port));
    println!("connected={}", first);
    println!("state={:?} attempts={}", st.state, st.attempts);
    println!("last_error={:?}", st.last_error);
    println!("frames_in={} frames_dropped={}", st.frames_in, st.frames_dropped);
    Ok(())
}

async fn run(cfg: &Config) -> Result<()> {
    info!("run: starting");

    let (link, handle, mut events) = Link::new(WsConnector, cfg.link.link_config());
    tokio::spawn(link.run());

    let surface = Arc::new(ConsoleSurface::default());
    let sink: Arc<dyn FrameSink> = Arc::new(handle.clone());

    let projector = Projector::new(surface.clone(), surface.clone(), surface.clone(), cfg.map.follow_zoom);
    let samples = SampleRegistry::new(sink.clone(), surface.clone(), surface.clone(), surface.clone(), cfg.samples.clone());
    samples.prime();
    let mut station = Station::new(projector, samples);
    let mut helm = Dispatcher::new(sink, surface.clone(), cfg.helm.clone());

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut release_at: Option<Instant> = None;

    loop {
        tokio::select! {
            ev = events.recv() => match ev {
                Some(ev) => station.handle(ev),
                None => break,
            },
            line = stdin.next_line() => {
                let Some(line) = line.context("read stdin")? else {
                    info!("run: stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let cmd = match ConsoleCmd::parse(&line) {
                    Ok(cmd) => cmd,
                    Err(e) => {
                        warn!("run: {:#}", e);
                        continue;
                    }
                };
                if cmd == ConsoleCmd::Quit {
                    break;
                }
                if let Some(hold) = execute(cmd, cfg, &mut helm, &mut station, surface.as_ref(), &handle) {
                    release_at = Some(Instant::now() + hold);
                }
            },
            _ = time::sleep_until(release_at.unwrap_or_else(Instant::now)), if release_at.is_some() => {
                release_at = None;
                helm.release();
            },
            _ = tokio::signal::ctrl_c() => {
                info!("run: interrupted");
                break;
            },
        }
    }

    info!("run: stopped");
    Ok(())
}

/// Runs one console command. Returns a hold duration when a camera button was
/// pressed and must be released later.
fn execute(
    cmd: ConsoleCmd,
    cfg: &Config,
    helm: &mut Dispatcher,
    station: &mut Station,
    surface: &ConsoleSurface,
    link: &LinkHandle,
) -> Option<Duration> {
    match cmd {
        ConsoleCmd::Motor(m) => {
            helm.fire(&Intent::Motor(m));
        }
        ConsoleCmd::Pump { pump_id, duration } => {
            if !cfg.helm.pumps.contains(&pump_id) {
                warn!("run: no pump {} on this vessel (have {:?})", pump_id, cfg.helm.pumps);
                return None;
            }
            helm.activate_pump(pump_id, &duration);
        }
        ConsoleCmd::Camera { direction, hold } => {
            helm.press(CameraButton::Move(direction));
            return Some(hold);
        }
        ConsoleCmd::Center => {
            helm.press(CameraButton::Center);
        }
        ConsoleCmd::Preset(name) => {
            if !PRESETS.contains(&name.as_str()) {
                warn!("run: unknown preset {:?}, known: {:?}", name, PRESETS);
                return None;
            }
            helm.fire(&Intent::Preset(name));
        }
        ConsoleCmd::SetPan(a) => {
            helm.fire(&Intent::SetPan(a));
        }
        ConsoleCmd::SetTilt(a) => {
            helm.fire(&Intent::SetTilt(a));
        }
        ConsoleCmd::Key(key) => {
            helm.key_down(&key);
            helm.key_up(&key);
        }
        ConsoleCmd::Samples(s) => match s {
            SamplesCmd::Refresh => station.samples.refresh(),
            SamplesCmd::Map => station.samples.show_on_map(),
            SamplesCmd::Geojson => {
                station.samples.export_geojson();
            }
            SamplesCmd::Csv => {
                station.samples.export_csv();
            }
        },
        ConsoleCmd::Locate => {
            if !station.projector.center_on_boat() {
                warn!("run: no position received yet");
            }
        }
        ConsoleCmd::Show => {
            for (field, value) in surface.snapshot() {
                println!("[{}]\n{}", field.id(), value);
            }
        }
        ConsoleCmd::Status => {
            let st = link.status();
            println!(
                "state={:?} attempts={} frames_in={} dropped={} last_error={:?} track={}",
                st.state,
                st.attempts,
                st.frames_in,
                st.frames_dropped,
                st.last_error,
                station.projector.track().len()
            );
        }
        ConsoleCmd::Quit => {}
    }
    None
}
