//! Sensor sampling and graph history.

use core::fmt;
use core::future::Future;

use crate::config::{GRAPH_SPAN, LIGHT_ADC_FULL_SCALE, TEMPERATURE_GRAPH_MAX_C};

/// The two sensors behind the graph views.
pub trait SensorBank {
    /// Die temperature in whole degrees Celsius.
    fn temperature_celsius(&mut self) -> impl Future<Output = i16>;

    /// Ambient light, 0 (dark) to 100 (bright).
    fn light_percent(&mut self) -> impl Future<Output = u8>;
}

/// A sensor value as shown next to the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    Celsius(i16),
    Percent(u8),
}

impl Reading {
    /// Graph magnitude for this reading.
    pub fn magnitude(self) -> u8 {
        match self {
            Reading::Celsius(c) => temperature_magnitude(c),
            Reading::Percent(p) => light_magnitude(p),
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Celsius(c) => write!(f, "{c}C"),
            Reading::Percent(p) => write!(f, "{p}%"),
        }
    }
}

/// Scale 0..=`TEMPERATURE_GRAPH_MAX_C` °C onto the graph span.
pub fn temperature_magnitude(celsius: i16) -> u8 {
    let celsius = i32::from(celsius.clamp(0, TEMPERATURE_GRAPH_MAX_C));
    (celsius * i32::from(GRAPH_SPAN) / i32::from(TEMPERATURE_GRAPH_MAX_C)) as u8
}

/// Scale 0..=100 % onto the graph span.
pub fn light_magnitude(percent: u8) -> u8 {
    let percent = u16::from(percent.min(100));
    (percent * GRAPH_SPAN / 100) as u8
}

/// Convert a raw ADC sample from the light sensor to a percentage. The
/// phototransistor pulls the line low in bright light.
pub fn light_percent_from_raw(raw: i16) -> u8 {
    let raw = i32::from(raw).clamp(0, LIGHT_ADC_FULL_SCALE);
    (100 - raw * 100 / LIGHT_ADC_FULL_SCALE) as u8
}

/// Fixed-capacity rolling history, oldest sample first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBuffer<const N: usize> {
    samples: [u8; N],
}

impl<const N: usize> SampleBuffer<N> {
    pub const fn new() -> Self {
        Self { samples: [0; N] }
    }

    /// Append `sample`, dropping the oldest one.
    pub fn push(&mut self, sample: u8) {
        if N == 0 {
            return;
        }
        self.samples.copy_within(1.., 0);
        self.samples[N - 1] = sample;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.samples
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
