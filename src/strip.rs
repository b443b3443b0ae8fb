//! LED strip capability
//!
//! The core only issues draw calls. Opening and closing the hardware is the
//! caller's business.

use core::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};

use smart_leds::SmartLedsWrite;

use crate::color::{BLACK, Rgb};
use crate::error::{Error, Result};

/// Addressable LED strip with a global brightness and an explicit flush
///
/// Implement this trait to support different hardware platforms.
pub trait Strip {
    /// Number of addressable pixels
    fn pixel_count(&self) -> usize;

    /// Buffer a pixel color. Out of range indices are ignored.
    fn set_pixel(&mut self, index: usize, color: Rgb);

    /// Set the global brightness applied when the frame is shown
    fn set_brightness(&mut self, brightness: u8);

    /// Make buffered changes visible
    fn show(&mut self) -> Result<()>;
}

/// Turn every pixel off and flush
pub fn clear_strip<S: Strip + ?Sized>(strip: &mut S) -> Result<()> {
    for index in 0..strip.pixel_count() {
        strip.set_pixel(index, BLACK);
    }
    strip.show()
}

/// [`Strip`] on top of any `smart-leds` driver
///
/// Keeps its own frame buffer and scales it by the global brightness when
/// the frame is written out.
pub struct SmartLedsStrip<W> {
    writer: W,
    frame: Vec<Rgb>,
    brightness: u8,
}

impl<W> SmartLedsStrip<W> {
    pub fn new(writer: W, pixel_count: usize) -> Self {
        Self {
            writer,
            frame: vec![BLACK; pixel_count],
            brightness: u8::MAX,
        }
    }

    /// Currently buffered frame, before brightness scaling
    pub fn frame(&self) -> &[Rgb] {
        &self.frame
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> Strip for SmartLedsStrip<W>
where
    W: SmartLedsWrite<Color = Rgb>,
    W::Error: fmt::Debug,
{
    fn pixel_count(&self) -> usize {
        self.frame.len()
    }

    fn set_pixel(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.frame.get_mut(index) {
            *pixel = color;
        }
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    fn show(&mut self) -> Result<()> {
        let frame = smart_leds::brightness(self.frame.iter().copied(), self.brightness);
        self.writer
            .write(frame)
            .map_err(|err| Error::Strip(format!("{err:?}")))
    }
}

/// Draw call observed by a [`MemoryStrip`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StripOp {
    SetPixel(usize, Rgb),
    SetBrightness(u8),
    /// Flushed frame and the brightness it was shown with
    Show { pixels: Vec<Rgb>, brightness: u8 },
}

/// Draw call together with the thread that issued it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripEvent {
    pub op: StripOp,
    pub thread: ThreadId,
}

/// Shared, cloneable record of every draw call made on a [`MemoryStrip`]
#[derive(Debug, Clone, Default)]
pub struct StripLog {
    events: Arc<Mutex<Vec<StripEvent>>>,
}

impl StripLog {
    fn push(&self, op: StripOp) {
        let event = StripEvent {
            op,
            thread: thread::current().id(),
        };
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<StripEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every flushed frame, in order
    pub fn frames(&self) -> Vec<Vec<Rgb>> {
        self.events()
            .into_iter()
            .filter_map(|event| match event.op {
                StripOp::Show { pixels, .. } => Some(pixels),
                _ => None,
            })
            .collect()
    }

    /// Most recently flushed frame
    pub fn last_frame(&self) -> Option<Vec<Rgb>> {
        self.frames().pop()
    }

    /// Every brightness level set, in order
    pub fn brightness_levels(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|event| match event.op {
                StripOp::SetBrightness(level) => Some(level),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// In-memory strip that records every draw call
///
/// Used for tests and for running without hardware.
#[derive(Debug, Clone)]
pub struct MemoryStrip {
    pixels: Vec<Rgb>,
    brightness: u8,
    shown: Vec<Rgb>,
    log: StripLog,
}

impl MemoryStrip {
    pub fn new(pixel_count: usize) -> Self {
        Self {
            pixels: vec![BLACK; pixel_count],
            brightness: u8::MAX,
            shown: vec![BLACK; pixel_count],
            log: StripLog::default(),
        }
    }

    /// Handle to the draw call log, usable after the strip has been moved
    pub fn log(&self) -> StripLog {
        self.log.clone()
    }

    /// Last flushed frame
    pub fn shown(&self) -> &[Rgb] {
        &self.shown
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }
}

impl Strip for MemoryStrip {
    fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    fn set_pixel(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
            self.log.push(StripOp::SetPixel(index, color));
        }
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
        self.log.push(StripOp::SetBrightness(brightness));
    }

    fn show(&mut self) -> Result<()> {
        self.shown.clone_from(&self.pixels);
        self.log.push(StripOp::Show {
            pixels: self.pixels.clone(),
            brightness: self.brightness,
        });
        Ok(())
    }
}
