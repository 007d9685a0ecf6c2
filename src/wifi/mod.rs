//! Wi-Fi subsystem - ESP32 coprocessor running esp-hosted firmware.
//!
//! The coprocessor sits on SPI3 with handshake, ready and reset lines.
//! `embassy-net-esp-hosted` turns it into an Ethernet-like device that
//! `embassy-net` runs DHCP and TCP over. The two runners and the join
//! supervisor each live in their own task; the control loop only reads
//! [`is_joined`].

pub mod http;

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_net_esp_hosted::{Control, NetDriver, Runner, State};
use embassy_nrf::gpio::{Input, Output};
use embassy_nrf::peripherals;
use embassy_nrf::spim::Spim;
use embassy_time::{with_timeout, Delay, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;

use touchdash::config::{NET_SOCKETS, WIFI_JOIN_TIMEOUT, WIFI_RETRY_PERIOD};
use touchdash::error::Error;

pub type EspSpi = ExclusiveDevice<Spim<'static, peripherals::SPI3>, Output<'static>, Delay>;

type EspRunner = Runner<'static, EspSpi, Input<'static>, Output<'static>>;

static ESP_STATE: StaticCell<State> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<NET_SOCKETS>> = StaticCell::new();

static JOINED: AtomicBool = AtomicBool::new(false);

/// Network credentials baked in at build time.
pub struct Credentials {
    pub ssid: &'static str,
    pub password: &'static str,
}

/// Associated and holding a DHCP lease.
pub fn is_joined() -> bool {
    JOINED.load(Ordering::Relaxed)
}

#[embassy_executor::task]
async fn esp_task(runner: EspRunner) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Join, then keep checking the link; rejoin whenever it is lost.
#[embassy_executor::task]
async fn join_task(
    mut control: Control<'static>,
    stack: Stack<'static>,
    credentials: &'static Credentials,
) -> ! {
    let mut initialised = false;
    loop {
        if stack.is_link_up() && stack.is_config_up() {
            JOINED.store(true, Ordering::Relaxed);
        } else {
            if JOINED.swap(false, Ordering::Relaxed) {
                warn!("Wi-Fi link lost");
            }
            if !initialised {
                match control.init().await {
                    Ok(()) => initialised = true,
                    Err(_) => warn!("Wi-Fi coprocessor did not initialise"),
                }
            }
            if initialised {
                match with_timeout(WIFI_JOIN_TIMEOUT, join(&mut control, stack, credentials)).await {
                    Ok(Ok(())) => JOINED.store(true, Ordering::Relaxed),
                    Ok(Err(e)) => warn!("Wi-Fi join failed: {}", e),
                    Err(_) => warn!("Wi-Fi join timed out"),
                }
            }
        }
        Timer::after(WIFI_RETRY_PERIOD).await;
    }
}

/// Start the coprocessor, the network stack and the join supervisor.
///
/// Only a failure to start the tasks is an error. Until the first join
/// succeeds the stack runs without an address, so every request fails
/// fast and the Wi-Fi icon stays inactive.
pub async fn start(
    spawner: Spawner,
    spi: EspSpi,
    handshake: Input<'static>,
    ready: Input<'static>,
    reset: Output<'static>,
    seed: u64,
    credentials: &'static Credentials,
) -> Result<Stack<'static>, Error> {
    let state = ESP_STATE.init(State::new());
    let (device, control, runner) =
        embassy_net_esp_hosted::new(state, spi, handshake, ready, reset).await;
    spawner.spawn(esp_task(runner)).map_err(|_| Error::Wifi)?;

    let resources = NET_RESOURCES.init(StackResources::new());
    let (stack, runner) = embassy_net::new(
        device,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );
    spawner.spawn(net_task(runner)).map_err(|_| Error::Wifi)?;
    spawner
        .spawn(join_task(control, stack, credentials))
        .map_err(|_| Error::Wifi)?;

    Ok(stack)
}

async fn join(
    control: &mut Control<'static>,
    stack: Stack<'static>,
    credentials: &Credentials,
) -> Result<(), Error> {
    info!("Joining {}", credentials.ssid);
    control
        .connect(credentials.ssid, credentials.password)
        .await
        .map_err(|_| Error::Wifi)?;

    stack.wait_config_up().await;
    if let Some(config) = stack.config_v4() {
        info!("DHCP address {}", config.address);
    }
    Ok(())
}
