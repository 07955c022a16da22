#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, DhcpConfig, StackResources};
use embassy_time::{Delay, Duration, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Io, Level, Output, OutputConfig, Pull};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::rng::Rng;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use log::{info, warn};
use relay_core::Error;
use relay_core::pages;
use static_cell::StaticCell;

use relay_firmware::app_state::{self, restart_on_fatal};
use relay_firmware::assets::FlashAssets;
use relay_firmware::storage::FlashCredentialStore;
use relay_firmware::{button_irq, display, render, server, wifi};

/// I2C clock for the OLED.
const I2C_FREQUENCY_KHZ: u32 = 500;
const SPLASH_DURATION: Duration = Duration::from_secs(2);

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 73744);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("Embassy initialized!");

    // Relay outputs start low, matching the recorded all-off state.
    let relay_pins = [
        Output::new(peripherals.GPIO1, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO3, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO4, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO5, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO6, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO7, Level::Low, OutputConfig::default()),
    ];
    let device = app_state::init_device_state(relay_pins);
    {
        let mut state = device.lock().await;
        if let Err(e) = state.relays.all_off() {
            warn!("Failed to clear relays: {}", e);
        }
        state.record("Boot");
    }

    // Blink the status LED once.
    let mut led = Output::new(peripherals.GPIO35, Level::High, OutputConfig::default());
    Timer::after(Duration::from_millis(100)).await;
    led.set_low();

    // The OLED is powered through Vext, which is active low.
    let _vext = Output::new(peripherals.GPIO36, Level::Low, OutputConfig::default());
    let mut oled_reset = Output::new(peripherals.GPIO21, Level::High, OutputConfig::default());
    let i2c = match I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(I2C_FREQUENCY_KHZ)),
    ) {
        Ok(i2c) => i2c.with_sda(peripherals.GPIO17).with_scl(peripherals.GPIO18),
        Err(_) => restart_on_fatal(Error::DisplayInitFailure),
    };
    let mut display = match display::init(i2c, &mut oled_reset, &mut Delay) {
        Ok(display) => display,
        Err(e) => restart_on_fatal(e),
    };
    if pages::draw_splash(&mut display, env!("CARGO_PKG_VERSION")).is_ok() {
        let _ = display.flush();
    }
    Timer::after(SPLASH_DURATION).await;

    let credential_store = match FlashCredentialStore::mount(peripherals.FLASH) {
        Ok(store) => store,
        Err(e) => restart_on_fatal(e),
    };

    // PRG button, active low.
    let mut io = Io::new(peripherals.IO_MUX);
    let button = Input::new(
        peripherals.GPIO0,
        InputConfig::default().with_pull(Pull::Up),
    );
    button_irq::install(&mut io, button);

    static RADIO: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
    let radio = RADIO.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));
    let (wifi_controller, interfaces) =
        esp_radio::wifi::new(radio, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi controller");

    let wifi_device = interfaces.sta;
    let mac = wifi_device.mac_address();

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;
    static NET_RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        wifi_device,
        NetConfig::dhcpv4(DhcpConfig::default()),
        NET_RESOURCES.init(StackResources::new()),
        seed,
    );

    spawner.spawn(wifi::net_runner_task(runner).unwrap());
    spawner.spawn(wifi::connection_task(wifi_controller, stack, credential_store).unwrap());
    spawner.spawn(server::http_task(stack, device, FlashAssets).unwrap());
    spawner.spawn(render::render_task(display, device, mac).unwrap());

    #[cfg(feature = "relay-self-test")]
    run_self_test(device).await;

    loop {
        Timer::after(Duration::from_secs(60)).await;
        info!("Uptime {} s", embassy_time::Instant::now().as_secs());
    }
}

/// Walk a single active relay across the bank, then switch everything off.
#[cfg(feature = "relay-self-test")]
async fn run_self_test(device: &'static app_state::FirmwareSharedState) {
    const STEP: Duration = Duration::from_millis(250);

    info!("Running relay self-test");
    for index in 0..relay_core::config::RELAY_COUNT {
        if let Err(e) = device.lock().await.chase_step(index) {
            warn!("Self-test step {} failed: {}", index, e);
        }
        Timer::after(STEP).await;
    }
    let mut state = device.lock().await;
    if let Err(e) = state.relays.all_off() {
        warn!("Failed to clear relays: {}", e);
    }
    state.record("Self-test done");
}
