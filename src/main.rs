//! sensor-browser firmware entry point (nRF52840).
//!
//! Two execution contexts:
//!   - the input tasks (buttons, card detect) on an interrupt executor at
//!     `EGU1_SWI1`, priority P6;
//!   - the main loop in thread mode, which owns the OLED, the SD card and
//!     the sensors.
//!
//! They only talk through the static [`SharedState`].

#![no_std]
#![no_main]

use defmt::{debug, info, unwrap, warn};
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_nrf::gpio::{Level, Output, OutputDrive, Pin};
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::saadc::{self, Saadc};
use embassy_nrf::spim::{self, Spim};
use embassy_nrf::temp::{self, Temp};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::{Delay, Duration, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use {defmt_rtt as _, panic_probe as _};

use sensor_browser::app::App;
use sensor_browser::board::OnChipSensors;
use sensor_browser::config::FRAME_DELAY_MS;
use sensor_browser::shared::SharedState;
use sensor_browser::storage::SdStorage;
use sensor_browser::ui::buttons::{button_task, card_detect_task};
use sensor_browser::ui::display::PageDisplay;
use sensor_browser::ui::oled::OledPanel;
use sensor_browser::ui::Button;

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
    SAADC => saadc::InterruptHandler;
    TEMP => temp::InterruptHandler;
});

static SHARED: SharedState = SharedState::new();
static INPUT_EXECUTOR: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn EGU1_SWI1() {
    INPUT_EXECUTOR.on_interrupt()
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("sensor-browser starting");

    // Inputs
    interrupt::EGU1_SWI1.set_priority(Priority::P6);
    let inputs = INPUT_EXECUTOR.start(interrupt::EGU1_SWI1);
    unwrap!(inputs.spawn(button_task(p.P0_11.degrade(), Button::ModeSwitch, &SHARED)));
    unwrap!(inputs.spawn(button_task(p.P0_12.degrade(), Button::PageUp, &SHARED)));
    unwrap!(inputs.spawn(button_task(p.P0_24.degrade(), Button::PageDown, &SHARED)));
    unwrap!(inputs.spawn(card_detect_task(p.P0_03.degrade(), &SHARED)));

    // OLED
    let mut i2c_config = twim::Config::default();
    i2c_config.frequency = twim::Frequency::K400;
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, i2c_config);
    let mut display = OledPanel::new(i2c);
    display.init();

    // SD card (SPI mode wants a slow clock during card init)
    let mut spi_config = spim::Config::default();
    spi_config.frequency = spim::Frequency::K250;
    let spi = Spim::new(p.SPI3, Irqs, p.P0_19, p.P0_21, p.P0_20, spi_config);
    let cs = Output::new(p.P0_22, Level::High, OutputDrive::Standard);
    let sd_device = unwrap!(ExclusiveDevice::new(spi, cs, Delay));
    let mut storage = SdStorage::new(sd_device, Delay);

    // Sensors
    let temp = Temp::new(p.TEMP, Irqs);
    let mut saadc = Saadc::new(
        p.SAADC,
        Irqs,
        saadc::Config::default(),
        [saadc::ChannelConfig::single_ended(p.P0_02)],
    );
    saadc.calibrate().await;
    let mut sensors = OnChipSensors::new(temp, saadc);

    info!("Init complete, entering main loop");

    let mut app = App::new(&SHARED);
    loop {
        let iteration = app.step(&mut display, &mut storage, &mut sensors).await;

        if iteration.switched {
            info!("Mode: {}", iteration.mode);
        }
        match iteration.mounted {
            Some(Ok(entries)) => info!("SD mounted: {} entries", entries),
            Some(Err(e)) => warn!("SD not browsable: {}", e),
            None => {}
        }
        if let Some(reading) = iteration.sampled {
            debug!("Sample: {}", reading);
        }

        Timer::after(Duration::from_millis(FRAME_DELAY_MS)).await;
    }
}
