//! Strip outputs: WS2812 over spidev, or the log for dry runs

use std::convert::Infallible;
use std::path::Path;

use anyhow::Context;
use linux_embedded_hal::SpidevBus;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use printer_light_composer::{Rgb, SmartLedsStrip};
use smart_leds::SmartLedsWrite;
use ws2812_spi::Ws2812;

/// WS2812 bit timing needs the bus clocked between 2 and 3.8 MHz
const SPI_SPEED_HZ: u32 = 3_800_000;

pub type SpiStrip = SmartLedsStrip<Ws2812<SpidevBus>>;
pub type DryRunStrip = SmartLedsStrip<LogWriter>;

pub fn open_spi(device: &Path, led_count: usize) -> anyhow::Result<SpiStrip> {
    let mut bus = SpidevBus::open(device)
        .with_context(|| format!("failed to open SPI device {}", device.display()))?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(SPI_SPEED_HZ)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    bus.configure(&options)
        .with_context(|| format!("failed to configure SPI device {}", device.display()))?;

    log::info!("driving {led_count} LEDs on {}", device.display());
    Ok(SmartLedsStrip::new(Ws2812::new(bus), led_count))
}

pub fn dry_run(led_count: usize) -> DryRunStrip {
    log::info!("dry run: frames of {led_count} LEDs go to the log");
    SmartLedsStrip::new(LogWriter, led_count)
}

/// Writes every frame to the log at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogWriter;

impl SmartLedsWrite for LogWriter {
    type Error = Infallible;
    type Color = Rgb;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        if log::log_enabled!(log::Level::Debug) {
            let frame = iterator
                .into_iter()
                .map(|color| {
                    let color: Rgb = color.into();
                    format!("{:02x}{:02x}{:02x}", color.r, color.g, color.b)
                })
                .collect::<Vec<_>>();
            log::debug!("frame [{}]", frame.join(" "));
        }
        Ok(())
    }
}
