//! Load config from file and environment.

use serde::Deserialize;
use std::path::PathBuf;

/// Daemon configuration. File: ~/.config/linecalc/config.toml or
/// /etc/linecalc/config.toml. Env overrides: LINECALC_BIND_IP,
/// LINECALC_<SERVICE>_PORT, LINECALC_MAX_IN_FLIGHT, LINECALC_CODEC_TABLE,
/// LINECALC_LOG_FILE.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Address all six services bind to (default 127.0.0.1).
    #[serde(default = "default_bind_ip")]
    pub bind_ip: String,
    /// One distinct port per calculator.
    #[serde(default = "default_rt_port")]
    pub rt_port: u16,
    #[serde(default = "default_erlang_port")]
    pub erlang_port: u16,
    #[serde(default = "default_bw_port")]
    pub bw_port: u16,
    #[serde(default = "default_cost_port")]
    pub cost_port: u16,
    #[serde(default = "default_plr_port")]
    pub plr_port: u16,
    #[serde(default = "default_report_port")]
    pub report_port: u16,
    /// Cap on concurrently running tasks per service.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
    /// Codec reference table fixture; compiled-in defaults when absent.
    #[serde(default)]
    pub codec_table: Option<PathBuf>,
    /// Append-mode log file; stderr when absent.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_bind_ip() -> String {
    "127.0.0.1".to_string()
}
fn default_rt_port() -> u16 {
    32003
}
fn default_erlang_port() -> u16 {
    32004
}
fn default_bw_port() -> u16 {
    32005
}
fn default_cost_port() -> u16 {
    32006
}
fn default_plr_port() -> u16 {
    32007
}
fn default_report_port() -> u16 {
    32008
}
fn default_max_in_flight() -> usize {
    64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_ip: default_bind_ip(),
            rt_port: default_rt_port(),
            erlang_port: default_erlang_port(),
            bw_port: default_bw_port(),
            cost_port: default_cost_port(),
            plr_port: default_plr_port(),
            report_port: default_report_port(),
            max_in_flight: default_max_in_flight(),
            codec_table: None,
            log_file: None,
        }
    }
}

/// Load config: merge default, then config file (if present), then env vars.
pub fn load() -> Config {
    let mut c = load_file().unwrap_or_else(Config::default);
    if let Ok(s) = std::env::var("LINECALC_BIND_IP") {
        if !s.trim().is_empty() {
            c.bind_ip = s;
        }
    }
    env_port("LINECALC_RT_PORT", &mut c.rt_port);
    env_port("LINECALC_ERLANG_PORT", &mut c.erlang_port);
    env_port("LINECALC_BW_PORT", &mut c.bw_port);
    env_port("LINECALC_COST_PORT", &mut c.cost_port);
    env_port("LINECALC_PLR_PORT", &mut c.plr_port);
    env_port("LINECALC_REPORT_PORT", &mut c.report_port);
    if let Ok(s) = std::env::var("LINECALC_MAX_IN_FLIGHT") {
        if let Ok(n) = s.parse::<usize>() {
            if n > 0 {
                c.max_in_flight = n;
            }
        }
    }
    if let Ok(s) = std::env::var("LINECALC_CODEC_TABLE") {
        if !s.trim().is_empty() {
            c.codec_table = Some(PathBuf::from(s));
        }
    }
    if let Ok(s) = std::env::var("LINECALC_LOG_FILE") {
        if !s.trim().is_empty() {
            c.log_file = Some(PathBuf::from(s));
        }
    }
    c
}

fn env_port(var: &str, out: &mut u16) {
    if let Ok(s) = std::env::var(var) {
        if let Ok(p) = s.parse::<u16>() {
            *out = p;
        }
    }
}

fn config_paths() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let mut out = Vec::new();
    if let Some(h) = home {
        out.push(h.join(".config/linecalc/config.toml"));
    }
    out.push(PathBuf::from("/etc/linecalc/config.toml"));
    out
}

fn load_file() -> Option<Config> {
    for p in config_paths() {
        if p.exists() {
            if let Ok(s) = std::fs::read_to_string(&p) {
                if let Ok(c) = toml::from_str::<Config>(&s) {
                    return Some(c);
                }
            }
            break;
        }
    }
    None
}
