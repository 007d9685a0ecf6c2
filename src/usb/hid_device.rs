//! USB HID keyboard device.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and exposes one boot-protocol keyboard endpoint that the
//! dashboard sends scene chords through.

use defmt::{info, warn};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_time::with_timeout;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;

use touchdash::config;
use touchdash::error::Error;
use touchdash::hid::keyboard::{KEYBOARD_REPORT_DESCRIPTOR, KEYBOARD_REPORT_SIZE};
use touchdash::hid::{chord_reports, HidOutput, Shortcut};

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

pub type KeyboardWriter = HidWriter<'static, UsbDriver, KEYBOARD_REPORT_SIZE>;

/// Descriptor and control buffers handed to the USB builder.
struct UsbBuffers {
    config: [u8; 256],
    bos: [u8; 256],
    msos: [u8; 256],
    control: [u8; 64],
}

static BUFFERS: StaticCell<UsbBuffers> = StaticCell::new();
static HID_STATE: StaticCell<State> = StaticCell::new();

/// Device runner and the keyboard endpoint, split so the runner can be
/// spawned on its own.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub keyboard_writer: KeyboardWriter,
}

/// Build the USB device with its single keyboard interface.
///
/// Call once; the descriptor buffers are static.
pub fn init(usbd: peripherals::USBD) -> UsbHidDevice {
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut device_config = Config::new(config::USB_VID, config::USB_PID);
    device_config.manufacturer = Some(config::USB_MANUFACTURER);
    device_config.product = Some(config::USB_PRODUCT);
    device_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    device_config.max_power = 100;
    device_config.max_packet_size_0 = 64;
    // Boot keyboards are class 0 at device level.
    device_config.device_class = 0x00;
    device_config.device_sub_class = 0x00;
    device_config.device_protocol = 0x00;
    device_config.composite_with_iads = false;

    let buffers = BUFFERS.init(UsbBuffers {
        config: [0; 256],
        bos: [0; 256],
        msos: [0; 256],
        control: [0; 64],
    });
    let mut builder = Builder::new(
        driver,
        device_config,
        &mut buffers.config,
        &mut buffers.bos,
        &mut buffers.msos,
        &mut buffers.control,
    );

    let keyboard_writer = HidWriter::new(
        &mut builder,
        HID_STATE.init(State::new()),
        HidConfig {
            report_descriptor: KEYBOARD_REPORT_DESCRIPTOR,
            request_handler: None,
            poll_ms: config::USB_HID_POLL_MS,
            max_packet_size: KEYBOARD_REPORT_SIZE as u16,
        },
    );

    info!(
        "USB keyboard {=u16:#x}:{=u16:#x} configured",
        config::USB_VID,
        config::USB_PID
    );
    UsbHidDevice {
        device: builder.build(),
        keyboard_writer,
    }
}

/// Service the bus forever: enumeration, suspend and control requests.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    device.run().await
}

/// Keyboard endpoint the host has enabled.
pub struct UsbKeyboard {
    writer: KeyboardWriter,
}

impl UsbKeyboard {
    /// Wait up to [`config::KEYBOARD_ENUM_TIMEOUT`] for the host to
    /// configure the keyboard interface.
    pub async fn attach(mut writer: KeyboardWriter) -> Result<Self, Error> {
        match with_timeout(config::KEYBOARD_ENUM_TIMEOUT, writer.ready()).await {
            Ok(()) => {
                info!("Keyboard activated");
                Ok(Self { writer })
            }
            Err(_) => Err(Error::NoKeyboardDevice),
        }
    }
}

impl HidOutput for UsbKeyboard {
    async fn send_chord(&mut self, shortcut: &Shortcut) {
        let mut buf = [0u8; KEYBOARD_REPORT_SIZE];
        for report in chord_reports(shortcut) {
            let n = report.serialize(&mut buf);
            match with_timeout(config::USB_WRITE_TIMEOUT, self.writer.write(&buf[..n])).await {
                Ok(Ok(())) => {}
                Ok(Err(_)) => warn!("USB keyboard write failed"),
                Err(_) => warn!("USB keyboard write timed out"),
            }
        }
    }
}
