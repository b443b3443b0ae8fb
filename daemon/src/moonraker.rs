//! Moonraker printer status client

use std::time::Duration;

use anyhow::Context;
use printer_light_composer::PrinterState;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::settings::MoonrakerSettings;

const PRINT_STATS_QUERY: &str = "/printer/objects/query?print_stats";
const PRINTING_STATS_QUERY: &str = "/printer/objects/query?heater_bed&extruder&display_status";
const POWER_OFF: &str = "/machine/device_power/off?printer";

/// Source of printer status
pub trait PrinterApi {
    /// Current printer state, `None` when the printer is unavailable
    fn printer_state(&mut self) -> Option<PrinterState>;

    /// Heater and print progress figures
    fn printing_stats(&mut self) -> anyhow::Result<PrintingStats>;

    /// Cut printer power
    fn power_off(&mut self) -> anyhow::Result<()>;

    /// Forget the heater temperatures captured at the start of a print
    fn reset_base_temps(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaterStats {
    pub temp: f64,
    pub target: f64,
    pub heating_percent: f64,
    pub power_percent: f64,
}

impl HeaterStats {
    /// Returns if the heater is on and has not reached its target
    pub fn is_heating(&self) -> bool {
        self.target > 0.0 && self.heating_percent < 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintingStats {
    pub bed: HeaterStats,
    pub extruder: HeaterStats,
    pub done_percent: f64,
}

/// Heating progress from `base` up to `target`
///
/// Zero while the heater has no target. A target at or below the base counts
/// as reached.
pub fn heating_percent(temp: f64, target: f64, base: f64) -> f64 {
    if target == 0.0 {
        return 0.0;
    }
    if target <= base {
        return 100.0;
    }
    ((temp - base) * 100.0 / (target - base)).floor()
}

#[derive(Debug, Deserialize)]
struct Query<T> {
    result: QueryResult<T>,
}

#[derive(Debug, Deserialize)]
struct QueryResult<T> {
    status: T,
}

#[derive(Debug, Deserialize)]
struct PrintStatsStatus {
    print_stats: Option<PrintStats>,
}

#[derive(Debug, Deserialize)]
struct PrintStats {
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PrintingStatus {
    heater_bed: Heater,
    extruder: Heater,
    display_status: DisplayStatus,
}

#[derive(Debug, Deserialize)]
struct Heater {
    temperature: f64,
    target: f64,
    #[serde(default)]
    power: f64,
}

#[derive(Debug, Deserialize)]
struct DisplayStatus {
    progress: f64,
}

/// Map a Moonraker `print_stats.state` onto a printer state
///
/// A cancelled print leaves the printer in standby.
pub fn parse_state(name: &str) -> Option<PrinterState> {
    match name {
        "cancelled" => Some(PrinterState::Standby),
        name => PrinterState::parse_from_str(name),
    }
}

fn parse_printer_state(body: &str) -> Option<PrinterState> {
    let query: Query<PrintStatsStatus> = serde_json::from_str(body).ok()?;
    let name = query.result.status.print_stats?.state?;
    let state = parse_state(&name);
    if state.is_none() {
        log::debug!("unknown printer state {name:?}");
    }
    state
}

/// Moonraker HTTP API client
pub struct Moonraker {
    base_url: String,
    agent: ureq::Agent,
    bed_base_temp: Option<f64>,
    extruder_base_temp: Option<f64>,
}

impl Moonraker {
    pub fn new(settings: &MoonrakerSettings) -> Self {
        Self::with_timeout(settings.base_url(), settings.timeout())
    }

    pub fn with_timeout(base_url: String, timeout: Duration) -> Self {
        Self {
            base_url,
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            bed_base_temp: None,
            extruder_base_temp: None,
        }
    }

    fn get_text(&self, path: &str) -> anyhow::Result<String> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .agent
            .get(&url)
            .call()
            .with_context(|| format!("GET {url} failed"))?;
        response
            .into_string()
            .with_context(|| format!("failed to read response of {url}"))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let body = self.get_text(path)?;
        serde_json::from_str(&body).with_context(|| format!("unexpected response to {path}"))
    }

    fn stats_from(&mut self, status: &PrintingStatus) -> PrintingStats {
        let bed_base = *self
            .bed_base_temp
            .get_or_insert(status.heater_bed.temperature);
        let extruder_base = *self
            .extruder_base_temp
            .get_or_insert(status.extruder.temperature);

        PrintingStats {
            bed: heater_stats(&status.heater_bed, bed_base),
            extruder: heater_stats(&status.extruder, extruder_base),
            done_percent: (status.display_status.progress * 100.0).round(),
        }
    }
}

fn heater_stats(heater: &Heater, base: f64) -> HeaterStats {
    HeaterStats {
        temp: heater.temperature,
        target: heater.target,
        heating_percent: heating_percent(heater.temperature, heater.target, base),
        power_percent: (heater.power * 100.0).round(),
    }
}

impl PrinterApi for Moonraker {
    fn printer_state(&mut self) -> Option<PrinterState> {
        match self.get_text(PRINT_STATS_QUERY) {
            Ok(body) => parse_printer_state(&body),
            Err(err) => {
                log::debug!("{err:#}");
                None
            }
        }
    }

    fn printing_stats(&mut self) -> anyhow::Result<PrintingStats> {
        let query: Query<PrintingStatus> = self.get_json(PRINTING_STATS_QUERY)?;
        Ok(self.stats_from(&query.result.status))
    }

    fn power_off(&mut self) -> anyhow::Result<()> {
        let url = format!("{}{POWER_OFF}", self.base_url);
        let response = self
            .agent
            .post(&url)
            .call()
            .with_context(|| format!("POST {url} failed"))?;
        log::info!("printer power off: {}", response.status_text());
        Ok(())
    }

    fn reset_base_temps(&mut self) {
        self.bed_base_temp = None;
        self.extruder_base_temp = None;
    }
}
