use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_channel::RecvTimeoutError;

use smlc_config::{parse_cells_cmd, SccpBackend, SmlcConfig};
use smlc_core::debug;
use smlc_entities::{sccp_lb, Smlc};
use smlc_saps::prim::ScuPrimUp;
use smlc_saps::sccp::{PointCode, SccpAddr};
use smlc_saps::transport::{NullTransport, SccpTransport};

/// Events feeding the single-threaded loop. A signalling backend injects
/// primitives through the same channel the shutdown handler uses.
enum NodeEvent {
    Prim(ScuPrimUp),
    Shutdown,
}

/// Load configuration file
fn load_config_from_toml(cfg_path: &str) -> SmlcConfig {
    match smlc_config::toml_config::from_file(cfg_path) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("Failed to load configuration from {}: {}", cfg_path, err);
            std::process::exit(1);
        }
    }
}

/// Build the SMLC context and apply the cells configuration
fn build_smlc(cfg: &SmlcConfig) -> Smlc {
    let Some(pc) = PointCode::parse(&cfg.sccp.local_pc) else {
        eprintln!("Invalid local point code: {}", cfg.sccp.local_pc);
        std::process::exit(1);
    };
    let local_addr = SccpAddr { pc: Some(pc), ssn: Some(cfg.sccp.ssn) };

    let transport: Box<dyn SccpTransport> = match cfg.sccp.backend {
        SccpBackend::None => Box::new(NullTransport),
        SccpBackend::Undefined => {
            eprintln!("No SCCP backend configured");
            std::process::exit(1);
        }
    };

    let mut smlc = Smlc::new(local_addr, cfg.timers.to_tdefs(), transport);

    for line in &cfg.cells {
        let result = parse_cells_cmd(line).and_then(|cmd| cmd.apply(&mut smlc.cells));
        if let Err(err) = result {
            eprintln!("cells: '{}': {}", line, err);
            std::process::exit(1);
        }
    }
    tracing::info!("loaded {} cell locations", smlc.cells.len());

    smlc
}

#[derive(Parser, Debug)]
#[command(
    version = smlc_core::STACK_VERSION,
    about = "Serving Mobile Location Center",
    long_about = "Answers BSSMAP-LE Perform Location Requests on the Lb interface, using \
                  cell-ID and timing advance against the configured cell locations"
)]
struct Args {
    /// Config file (required)
    #[arg(help = "TOML config with SCCP and cell location parameters")]
    config: String,
}

fn main() {
    let args = Args::parse();
    let cfg = load_config_from_toml(&args.config);
    let _log_guard = debug::setup_logging_default(cfg.debug_log.clone());

    eprintln!("smlc-node {}", smlc_core::STACK_VERSION);

    let mut smlc = build_smlc(&cfg);

    let (tx, rx) = crossbeam_channel::bounded::<NodeEvent>(64);
    ctrlc::set_handler(move || {
        let _ = tx.send(NodeEvent::Shutdown);
    })
    .expect("failed to set Ctrl+C handler");

    loop {
        match rx.recv_timeout(Duration::from_millis(250)) {
            Ok(NodeEvent::Prim(prim)) => {
                smlc.set_now(Instant::now());
                sccp_lb::rx_prim(&mut smlc, prim);
            }
            Ok(NodeEvent::Shutdown) => {
                tracing::info!("shutdown requested");
                break;
            }
            Err(RecvTimeoutError::Timeout) => {
                smlc.set_now(Instant::now());
                smlc.poll_timers();
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    smlc.shutdown();
}
