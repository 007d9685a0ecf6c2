//! touchdash firmware - Embassy async entry point.
//!
//! Target: nRF52840 DK with an Adafruit 2.8" capacitive TFT shield on the
//! Arduino header and an ESP32 running esp-hosted on SPI3.
//!
//! Bring-up order: USB keyboard, display, touch, Wi-Fi. After that a single
//! loop mirrors the Wi-Fi join state onto its icon and calls
//! [`touchdash::tick`] every [`config::TICK_INTERVAL`]. A fatal condition
//! resets the MCU.

#![no_std]
#![no_main]

mod panel;
mod usb;
mod wifi;

use defmt::{error, info, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::rng::{self, Rng};
use embassy_nrf::{bind_interrupts, peripherals, spim, twim};
use embassy_time::{Delay, Instant, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ILI9341Rgb565;
use mipidsi::options::{ColorOrder, Orientation, Rotation};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use touchdash::config::{self, SCENES, SCREEN_HEIGHT, SCREEN_WIDTH, TICK_INTERVAL};
use touchdash::error::Error;
use touchdash::quote::ContentRefresher;
use touchdash::status::probe::{RouterEndpoint, StatusProbe};
use touchdash::ui::ButtonRegistry;
use touchdash::{tick, DashboardState, Peripherals};

use panel::display::TftRenderer;
use panel::touch::Ft6206;
use usb::hid_device::{self, UsbDriver, UsbKeyboard};
use wifi::http::HttpClient;
use wifi::Credentials;

bind_interrupts!(struct Irqs {
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<peripherals::SPI2>;
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    RNG => rng::InterruptHandler<peripherals::RNG>;
});

static WIFI: Credentials = Credentials {
    ssid: env!("TOUCHDASH_WIFI_SSID"),
    password: env!("TOUCHDASH_WIFI_PASSWORD"),
};

const ROUTER: RouterEndpoint = RouterEndpoint {
    host: env!("TOUCHDASH_ROUTER_IP"),
    port: match option_env!("TOUCHDASH_ROUTER_PORT") {
        Some(port) => parse_port(port),
        None => config::ROUTER_DEFAULT_PORT,
    },
};

const QUOTE_URL: &str = match option_env!("TOUCHDASH_QUOTE_URL") {
    Some(url) => url,
    None => config::QUOTE_URL,
};

/// Build-time port parsing; a bad value fails the build.
const fn parse_port(s: &str) -> u16 {
    let bytes = s.as_bytes();
    assert!(!bytes.is_empty(), "TOUCHDASH_ROUTER_PORT is empty");
    let mut port: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        assert!(digit.is_ascii_digit(), "TOUCHDASH_ROUTER_PORT is not a number");
        port = port * 10 + (digit - b'0') as u32;
        assert!(port <= u16::MAX as u32, "TOUCHDASH_ROUTER_PORT out of range");
        i += 1;
    }
    port as u16
}

static DISPLAY_BUF: StaticCell<[u8; 512]> = StaticCell::new();

#[embassy_executor::task]
async fn usb_task(device: embassy_usb::UsbDevice<'static, UsbDriver>) -> ! {
    hid_device::run_usb_device(device).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("touchdash starting");

    if let Err(e) = run(spawner).await {
        error!("Fatal: {}, resetting", e);
        Timer::after_millis(100).await;
        cortex_m::peripheral::SCB::sys_reset();
    }
}

async fn run(spawner: Spawner) -> Result<(), Error> {
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.hfclk_source = embassy_nrf::config::HfclkSource::ExternalXtal;
    let p = embassy_nrf::init(nrf_config);

    // - USB keyboard ---------------------------------------------------
    let usb = hid_device::init(p.USBD);
    spawner.spawn(usb_task(usb.device)).map_err(|_| Error::Usb)?;
    let keyboard = match UsbKeyboard::attach(usb.keyboard_writer).await {
        Ok(keyboard) => Some(keyboard),
        Err(e) => {
            warn!("{}: touch buttons disabled", e);
            None
        }
    };

    // - Display (SPI2, shield pins D13/D11/D10/D9) ---------------------
    let mut spi_config = spim::Config::default();
    spi_config.frequency = spim::Frequency::M8;
    let spi = spim::Spim::new_txonly(p.SPI2, Irqs, p.P1_15, p.P1_13, spi_config);
    let tft_cs = Output::new(p.P1_12, Level::High, OutputDrive::Standard);
    let tft_dc = Output::new(p.P1_11, Level::Low, OutputDrive::Standard);
    let tft_spi = ExclusiveDevice::new(spi, tft_cs, Delay).map_err(|_| Error::Display)?;
    let interface = SpiInterface::new(tft_spi, tft_dc, DISPLAY_BUF.init([0; 512]));

    let panel = mipidsi::Builder::new(ILI9341Rgb565, interface)
        .display_size(SCREEN_HEIGHT, SCREEN_WIDTH)
        .orientation(Orientation::new().rotate(Rotation::Deg90))
        .color_order(ColorOrder::Bgr)
        .init(&mut Delay)
        .map_err(|_| Error::Display)?;

    let buttons = ButtonRegistry::bottom_row(SCREEN_WIDTH, SCREEN_HEIGHT, &SCENES)?;
    let renderer = TftRenderer::new(panel, &buttons);

    // - Touch (TWIM0 on the shield's SDA/SCL) --------------------------
    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let touch = Ft6206::new(i2c).await?;

    // - Wi-Fi coprocessor (SPI3) ---------------------------------------
    let mut esp_config = spim::Config::default();
    esp_config.frequency = spim::Frequency::M32;
    esp_config.mode = spim::MODE_2;
    let esp_bus = spim::Spim::new(p.SPI3, Irqs, p.P0_29, p.P0_31, p.P0_30, esp_config);
    let esp_cs = Output::new(p.P0_10, Level::High, OutputDrive::HighDrive);
    let esp_spi = ExclusiveDevice::new(esp_bus, esp_cs, Delay).map_err(|_| Error::Wifi)?;
    let handshake = Input::new(p.P1_01, Pull::Up);
    let ready = Input::new(p.P1_04, Pull::None);
    let reset = Output::new(p.P1_05, Level::Low, OutputDrive::Standard);

    let mut rng = Rng::new(p.RNG, Irqs);
    let mut net_seed = [0u8; 8];
    let mut tls_seed = [0u8; 8];
    rng.blocking_fill_bytes(&mut net_seed);
    rng.blocking_fill_bytes(&mut tls_seed);

    let stack = wifi::start(
        spawner,
        esp_spi,
        handshake,
        ready,
        reset,
        u64::from_le_bytes(net_seed),
        &WIFI,
    )
    .await?;

    // - Control loop ---------------------------------------------------
    let mut state = DashboardState::new(
        StatusProbe::new(ROUTER),
        ContentRefresher::new(QUOTE_URL),
        buttons,
    );
    let mut io = Peripherals {
        transport: HttpClient::new(stack, u64::from_le_bytes(tls_seed)),
        renderer,
        input: touch,
        hid: keyboard,
        delay: Delay,
    };
    state.start(&mut io.renderer, wifi::is_joined(), io.hid.is_some());
    info!("Dashboard running");

    loop {
        state.show_wifi(&mut io.renderer, wifi::is_joined());
        tick(&mut state, &mut io, Instant::now()).await?;
        Timer::after(TICK_INTERVAL).await;
    }
}
