//! Long-lived task loops and the channel between them.
//!
//! Two perpetual loops: the reed poll task (trigger source) and the print
//! worker (dispatch). Each runs a single future driven by `block_on` on its
//! own thread — printing blocks for seconds at a time and must not stall
//! reed polling, so the tasks need real preemption, not cooperative
//! scheduling on a shared executor.

pub mod channels;
pub mod dispatch;
pub mod trigger;

pub use channels::{TRIGGER_QUEUE, TriggerQueue, TriggerSignal};

/// Spawn a named task thread. On ESP-IDF the thread is a FreeRTOS task
/// pinned to the APP core (core 1), away from the WiFi/lwIP stacks on core
/// 0. `name` must be null-terminated for the pthread config.
pub(crate) fn spawn_task(
    name: &'static str,
    stack_kb: usize,
    f: impl FnOnce() + Send + 'static,
) -> std::thread::JoinHandle<()> {
    #[cfg(target_os = "espidf")]
    {
        // SAFETY: esp_pthread_set_cfg stores thread-local config consumed by
        // the next pthread_create from this thread; we spawn immediately
        // after, with no interleaved thread creation.
        unsafe {
            let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
            cfg.pin_to_core = 1;
            cfg.stack_size = (stack_kb * 1024) as i32;
            cfg.thread_name = name.as_ptr().cast();
            let ret = esp_idf_sys::esp_pthread_set_cfg(&cfg);
            assert!(
                ret == esp_idf_sys::ESP_OK as i32,
                "esp_pthread_set_cfg failed: {ret}"
            );
        }
    }

    let display_name = name.trim_end_matches('\0');
    log::info!("tasks: spawning '{display_name}' (stack {stack_kb}KB)");

    std::thread::Builder::new()
        .name(display_name.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
        .expect("task thread creation failed")
}
