use std::{env, path::PathBuf};

use anyhow::Result;

#[derive(Debug, Clone)]
pub struct Config {
    /// Podíl celkové paměti, který se má alokovat (první poziční argument).
    /// Neparsovatelná hodnota není chyba - spadne se na default 0.5.
    pub percent: f64,

    /// Zdroj paměťových metrik v meminfo formátu.
    pub meminfo_path: PathBuf,

    /// Interval (v sekundách), jak často se mají stránky znovu dotknout.
    /// Default 10s, minimum 1s.
    pub touch_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let percent = env::args()
            .nth(1)
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.5);

        let meminfo_path =
            env::var("MEMINFO_PATH").unwrap_or_else(|_| "/proc/meminfo".to_string());

        let touch_interval_secs = env::var("TOUCH_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10)
            .max(1); // nechceme 0 → busy loop

        Ok(Self {
            percent,
            meminfo_path: PathBuf::from(meminfo_path),
            touch_interval_secs,
        })
    }
}
