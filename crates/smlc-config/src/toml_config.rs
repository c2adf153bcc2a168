use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use toml::Value;

use super::smlc_config::{CfgSccp, CfgTimers, SccpBackend, SmlcConfig};

/// Build `SmlcConfig` from a TOML configuration file
pub fn from_toml_str(toml_str: &str) -> Result<SmlcConfig, Box<dyn std::error::Error>> {
    let root: TomlConfigRoot = toml::from_str(toml_str)?;

    // Various sanity checks
    let expected_config_version = "0.1";
    if !root.config_version.eq(expected_config_version) {
        return Err(format!(
            "Unrecognized config_version: {}, expect {}",
            root.config_version, expected_config_version
        )
        .into());
    }
    if !root.extra.is_empty() {
        return Err(format!("Unrecognized top-level fields: {:?}", sorted_keys(&root.extra)).into());
    }
    if let Some(ref sccp) = root.sccp {
        if !sccp.extra.is_empty() {
            return Err(format!("Unrecognized fields: sccp::{:?}", sorted_keys(&sccp.extra)).into());
        }
    }
    if let Some(ref timers) = root.timers {
        if !timers.extra.is_empty() {
            return Err(
                format!("Unrecognized fields: timers::{:?}", sorted_keys(&timers.extra)).into()
            );
        }
    }

    // Build config from required and optional values
    let mut cfg = SmlcConfig {
        debug_log: root.debug_log,
        sccp: CfgSccp::default(),
        timers: CfgTimers::default(),
        cells: root.cells.unwrap_or_default(),
    };

    if let Some(sccp) = root.sccp {
        if let Some(backend) = sccp.backend {
            cfg.sccp.backend = backend;
        }
        if let Some(local_pc) = sccp.local_pc {
            cfg.sccp.local_pc = local_pc;
        }
        if let Some(ssn) = sccp.ssn {
            cfg.sccp.ssn = ssn;
        }
    }

    if let Some(timers) = root.timers {
        cfg.timers.t_ta_response = timers.t_ta_response;
        cfg.timers.t_reset_ack = timers.t_reset_ack;
        cfg.timers.t_discard = timers.t_discard;
    }

    Ok(cfg)
}

/// Build `SmlcConfig` from any reader.
pub fn from_reader<R: Read>(reader: R) -> Result<SmlcConfig, Box<dyn std::error::Error>> {
    let mut contents = String::new();
    let mut reader = BufReader::new(reader);
    reader.read_to_string(&mut contents)?;
    from_toml_str(&contents)
}

/// Build `SmlcConfig` from a file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SmlcConfig, Box<dyn std::error::Error>> {
    let f = File::open(path)?;
    let r = BufReader::new(f);
    from_reader(r)
}

fn sorted_keys(extra: &HashMap<String, Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = extra.keys().collect();
    keys.sort();
    keys
}

#[derive(Debug, Deserialize)]
struct TomlConfigRoot {
    config_version: String,
    debug_log: Option<String>,
    sccp: Option<SccpDto>,
    timers: Option<TimersDto>,
    cells: Option<Vec<String>>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct SccpDto {
    backend: Option<SccpBackend>,
    local_pc: Option<String>,
    ssn: Option<u8>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct TimersDto {
    t_ta_response: Option<u64>,
    t_reset_ack: Option<u64>,
    t_discard: Option<u64>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config() {
        let cfg = from_toml_str(
            r#"
            config_version = "0.1"
            debug_log = "/tmp/smlc.log"

            cells = [
                "cgi 001 01 23 42 lat 23.000000 lon 42.000000",
                "lac-ci 5 6 lat -1.5 lon 2.25",
            ]

            [sccp]
            backend = "None"
            local_pc = "0.23.6"

            [timers]
            t_ta_response = 7
            "#,
        )
        .unwrap();

        assert_eq!(cfg.debug_log.as_deref(), Some("/tmp/smlc.log"));
        assert_eq!(cfg.sccp.backend, SccpBackend::None);
        assert_eq!(cfg.cells.len(), 2);
        let tdefs = cfg.timers.to_tdefs();
        assert_eq!(tdefs.t_ta_response.as_secs(), 7);
        assert_eq!(tdefs.t_reset_ack.as_secs(), 5);
    }

    #[test]
    fn rejects_unknown_fields_and_versions() {
        assert!(from_toml_str("config_version = \"9.9\"").is_err());
        assert!(from_toml_str("config_version = \"0.1\"\nbogus = 1").is_err());
        assert!(from_toml_str("config_version = \"0.1\"\n[sccp]\nbogus = 1").is_err());
    }
}
