//! Memory snapshot based on /proc/meminfo (or any meminfo-format source).

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use thiserror::Error;

/// Okamžitý snímek paměti, hodnoty v kB tak, jak je hlásí zdroj.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemSnapshot {
    pub total_kb: u64,
    /// Best-effort - starší jádra MemAvailable nehlásí, pak zůstává 0.
    pub available_kb: u64,
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("memory metrics source unavailable")]
    SourceUnavailable(#[from] std::io::Error),
    #[error("no MemTotal entry in metrics source")]
    MissingTotal,
}

/// Přečte a naparsuje snímek paměti ze souboru (typicky /proc/meminfo).
pub fn read(path: &Path) -> Result<MemSnapshot, ProbeError> {
    let file = File::open(path)?;
    parse(BufReader::new(file))
}

/// Parsuje meminfo formát: `<klíč>: <hodnota> <jednotka>`, hodnoty v kB,
/// jednotka se ignoruje. Vadné řádky (málo tokenů, nečíselná hodnota,
/// neznámý klíč) se mlčky přeskakují; při opakovaném klíči vyhrává
/// poslední výskyt.
fn parse(reader: impl BufRead) -> Result<MemSnapshot, ProbeError> {
    let mut total_kb = None;
    let mut available_kb = None;

    for line_res in reader.lines() {
        let line = line_res?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }

        let key = parts[0].trim_end_matches(':');
        let value_kb = match parts[1].parse::<u64>() {
            Ok(v) => v,
            Err(_) => continue,
        };

        match key {
            "MemTotal" => total_kb = Some(value_kb),
            "MemAvailable" => available_kb = Some(value_kb),
            _ => {}
        }
    }

    match total_kb {
        Some(total_kb) => Ok(MemSnapshot {
            total_kb,
            available_kb: available_kb.unwrap_or(0),
        }),
        None => Err(ProbeError::MissingTotal),
    }
}
