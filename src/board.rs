//! nRF52840 on-chip sensors behind [`SensorBank`].

use defmt::debug;
use embassy_nrf::saadc::Saadc;
use embassy_nrf::temp::Temp;

use crate::sensors::{light_percent_from_raw, SensorBank};

/// Die temperature from `TEMP`, ambient light from one `SAADC` channel.
pub struct OnChipSensors<'d> {
    temp: Temp<'d>,
    saadc: Saadc<'d, 1>,
}

impl<'d> OnChipSensors<'d> {
    pub fn new(temp: Temp<'d>, saadc: Saadc<'d, 1>) -> Self {
        Self { temp, saadc }
    }
}

impl SensorBank for OnChipSensors<'_> {
    async fn temperature_celsius(&mut self) -> i16 {
        let celsius = self.temp.read().await.to_num::<i16>();
        debug!("Temperature: {} C", celsius);
        celsius
    }

    async fn light_percent(&mut self) -> u8 {
        let mut raw = [0i16; 1];
        self.saadc.sample(&mut raw).await;
        let percent = light_percent_from_raw(raw[0]);
        debug!("Light: raw {} -> {}%", raw[0], percent);
        percent
    }
}
