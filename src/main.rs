//! Rumour Mill — main entry point.
//!
//! Hexagonal bring-up: adapters on the outside, the guarded registry in the
//! middle, two long-lived tasks around it.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  ApAdapter      EspHttpServer     FsStore      NvsAdapter    │
//! │  (soft-AP)      (→ web engine)    (snapshot)   (config)      │
//! │  ReedInput      ThermalPrinter                               │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │   reed poll ──▶ trigger queue ──▶ dispatch worker            │
//! │        (both reading/charging the RumorRegistry)             │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::{self, PinDriver, Pull};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::uart::UartDriver;
use esp_idf_svc::hal::uart::config::Config as UartConfig;
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use rumormill::adapters::fs_store::{self, FsStore};
use rumormill::adapters::http;
use rumormill::adapters::nvs::NvsAdapter;
use rumormill::adapters::printer::ThermalPrinter;
use rumormill::adapters::reed_input::ReedInput;
use rumormill::adapters::wifi::ApAdapter;
use rumormill::app::RumorRegistry;
use rumormill::app::ports::ConfigPort;
use rumormill::config::SystemConfig;
use rumormill::drivers::status_led::StatusLed;
use rumormill::pins;
use rumormill::tasks::{TRIGGER_QUEUE, dispatch, trigger};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    info!("Rumour Mill v{}", env!("CARGO_PKG_VERSION"));

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    // ── 2. Config from NVS (or defaults) ──────────────────────
    let config = match NvsAdapter::new() {
        Ok(nvs) => match nvs.load() {
            Ok(cfg) => {
                info!("config loaded from NVS");
                cfg
            }
            Err(e) => {
                warn!("NVS config load failed ({e}), using defaults");
                SystemConfig::default()
            }
        },
        Err(e) => {
            warn!("NVS init failed ({e}), using defaults without persistence");
            SystemConfig::default()
        }
    };

    // ── 3. Snapshot storage + registry ────────────────────────
    // Degrade, don't crash: a dead partition means an empty, non-persistent
    // rumor list, but the kiosk still serves and prints.
    if let Err(e) = fs_store::mount_storage() {
        warn!("storage mount failed ({e}); rumors will not persist");
    }
    let registry = Arc::new(RumorRegistry::open(
        FsStore::new(&config.rumors_path),
        Duration::from_millis(u64::from(config.lock_timeout_ms)),
        config.default_max_prints,
    ));
    match registry.count() {
        Ok(n) => info!("registry ready with {n} rumors"),
        Err(e) => warn!("registry count failed: {e}"),
    }

    // ── 4. Printer on UART1 ───────────────────────────────────
    let uart = UartDriver::new(
        peripherals.uart1,
        peripherals.pins.gpio17,
        peripherals.pins.gpio16,
        Option::<gpio::Gpio0>::None,
        Option::<gpio::Gpio0>::None,
        &UartConfig::default().baudrate(Hertz(pins::PRINTER_BAUD)),
    )?;
    let mut printer = ThermalPrinter::new(uart);

    // ── 5. Soft-AP + web server ───────────────────────────────
    let mut ap = ApAdapter::new(
        peripherals.modem,
        sysloop,
        nvs_partition,
        &config.ap_ssid,
        &config.ap_password,
    )
    .map_err(|e| anyhow::anyhow!("wifi: {e}"))?;
    ap.start().map_err(|e| anyhow::anyhow!("wifi: {e}"))?;
    info!("AP '{}' at {}", ap.ssid(), ap.ip());

    // Handlers live as long as this binding; main never returns.
    let _server = http::start(Arc::clone(&registry))?;

    // ── 6. Ready: LED on, startup slip ────────────────────────
    let mut led = StatusLed::new();
    led.set(true);
    dispatch::render_startup_slip(&mut printer, ap.ssid(), &ap.ip());

    // ── 7. Reed poll task ─────────────────────────────────────
    let mut reed_pin = PinDriver::input(peripherals.pins.gpio4)?;
    reed_pin.set_pull(Pull::Up)?;
    let _trigger_task = trigger::spawn(
        ReedInput::new(reed_pin),
        &TRIGGER_QUEUE,
        config.reed_poll_ms,
        config.print_cooldown_ms,
    );

    // ── 8. The main task becomes the dispatch worker ──────────
    info!("system ready, entering dispatch loop");
    futures_lite::future::block_on(dispatch::run(&registry, &mut printer, &TRIGGER_QUEUE));
    Ok(())
}
