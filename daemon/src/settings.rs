//! Settings file
//!
//! A TOML document with `[moonraker]`, `[strip]`, `[shutdown]`,
//! `[effects.<state>]` and `[progress.<phase>]` tables. Every table and key
//! is optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use printer_light_composer::{EffectsSettings, ProgressSettings, StripSettings};
use serde::Deserialize;

/// Used when the requested settings file does not exist
pub const SAMPLE_FILE_NAME: &str = "settings.sample.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub moonraker: MoonrakerSettings,
    pub strip: StripSection,
    pub shutdown: ShutdownSettings,
    pub effects: EffectsSettings,
    pub progress: ProgressSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MoonrakerSettings {
    pub host: String,
    pub port: u16,
    /// Seconds between two status polls
    pub poll_interval: f64,
    /// Seconds before an HTTP request is abandoned
    pub timeout: f64,
}

impl Default for MoonrakerSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 7125,
            poll_interval: 2.0,
            timeout: 5.0,
        }
    }
}

impl MoonrakerSettings {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn poll_interval(&self) -> Duration {
        seconds(self.poll_interval, 2.0)
    }

    pub fn timeout(&self) -> Duration {
        seconds(self.timeout, 5.0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StripSection {
    #[serde(flatten)]
    pub layout: StripSettings,
    /// SPI device the strip data line is wired to
    pub spi_device: PathBuf,
}

impl Default for StripSection {
    fn default() -> Self {
        Self {
            layout: StripSettings::default(),
            spi_device: PathBuf::from("/dev/spidev0.0"),
        }
    }
}

impl StripSection {
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.layout.idle_timeout > 0).then(|| Duration::from_secs(self.layout.idle_timeout))
    }
}

/// Powering the printer off once a print has finished and cooled down
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShutdownSettings {
    pub when_complete: bool,
    pub bed_temp_for_off: f64,
    pub hotend_temp_for_off: f64,
}

impl Default for ShutdownSettings {
    fn default() -> Self {
        Self {
            when_complete: false,
            bed_temp_for_off: 35.0,
            hotend_temp_for_off: 30.0,
        }
    }
}

impl Settings {
    /// Read settings from `path`, or from the sample file next to it when
    /// `path` does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let path = if path.exists() {
            path.to_owned()
        } else {
            let sample = path.with_file_name(SAMPLE_FILE_NAME);
            log::warn!(
                "{} not found, falling back to {}",
                path.display(),
                sample.display()
            );
            sample
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

fn seconds(value: f64, fallback: f64) -> Duration {
    Duration::try_from_secs_f64(value)
        .ok()
        .filter(|duration| !duration.is_zero())
        .unwrap_or_else(|| Duration::from_secs_f64(fallback))
}

#[cfg(test)]
mod tests {
    use printer_light_composer::{ColorValue, EffectSpeed, PrinterState, Rgb};

    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.moonraker.base_url(), "http://localhost:7125");
        assert_eq!(settings.moonraker.poll_interval(), Duration::from_secs(2));
        assert_eq!(settings.strip.layout.led_count, 10);
        assert_eq!(settings.strip.idle_timeout(), None);
    }

    #[test]
    fn test_full_document() {
        let settings = Settings::parse(
            r#"
            [moonraker]
            host = "voron.local"
            port = 7126
            poll_interval = 0.5

            [strip]
            led_count = 24
            led_brightness = 128
            idle_timeout = 600
            spi_device = "/dev/spidev1.0"

            [shutdown]
            when_complete = true
            bed_temp_for_off = 40

            [effects.standby]
            effect = "fade"
            color_1 = [255, 0, 255]
            speed = "slow"

            [effects.complete]
            effect = "ghost_bounce"
            color_1 = "rainbow"
            reverse = true

            [progress.printing]
            base_color = [0, 0, 0]
            progress_color = [0, 0, 255]
            reverse = true
            "#,
        )
        .unwrap();

        assert_eq!(settings.moonraker.base_url(), "http://voron.local:7126");
        assert_eq!(settings.moonraker.poll_interval(), Duration::from_millis(500));
        assert_eq!(settings.strip.layout.led_count, 24);
        assert_eq!(settings.strip.layout.led_brightness, 128);
        assert_eq!(settings.strip.idle_timeout(), Some(Duration::from_secs(600)));
        assert_eq!(settings.strip.spi_device, PathBuf::from("/dev/spidev1.0"));

        assert!(settings.shutdown.when_complete);
        assert!((settings.shutdown.bed_temp_for_off - 40.0).abs() < f64::EPSILON);
        assert!((settings.shutdown.hotend_temp_for_off - 30.0).abs() < f64::EPSILON);

        let standby = settings.effects.for_state(PrinterState::Standby).unwrap();
        assert_eq!(standby.effect.as_deref(), Some("fade"));
        assert_eq!(standby.color_1, Some(ColorValue::from(Rgb::new(255, 0, 255))));
        assert_eq!(standby.speed(), EffectSpeed::Slow);

        let complete = settings.effects.for_state(PrinterState::Complete).unwrap();
        assert!(complete.color_1.as_ref().unwrap().is_rainbow());
        assert!(complete.reverse());

        assert_eq!(settings.progress.printing.progress_color, Rgb::new(0, 0, 255));
        assert!(settings.progress.printing.reverse);
        assert_eq!(
            settings.progress.bed_heating,
            ProgressSettings::default().bed_heating
        );
    }

    #[test]
    fn test_zero_poll_interval_falls_back() {
        let settings = Settings::parse("[moonraker]\npoll_interval = 0").unwrap();
        assert_eq!(settings.moonraker.poll_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_missing_file_uses_sample() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("does-not-exist.toml");
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.moonraker.port, 7125);
    }

    #[test]
    fn test_mistyped_effect_entry_still_loads() {
        let settings = Settings::parse(
            r#"
            [effects.error]
            effect = "fade"
            color_1 = [300, 0, 0]
            speed = true
            "#,
        )
        .unwrap();

        let error = settings.effects.for_state(PrinterState::Error).unwrap();
        assert_eq!(error.effect.as_deref(), Some("fade"));
        assert_eq!(error.color_1, None);
        assert_eq!(error.speed(), EffectSpeed::Fast);
    }

    #[test]
    fn test_rejects_malformed_document() {
        assert!(Settings::parse("[strip]\nled_count = \"many\"").is_err());
    }
}
