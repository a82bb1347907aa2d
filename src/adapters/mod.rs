//! Driven adapters: hardware, storage, and transport implementations of the
//! port traits. Each is cfg-gated internally so the domain side compiles and
//! tests on the host.

pub mod fs_store;
pub mod nvs;
pub mod printer;
pub mod reed_input;
pub mod wifi;

#[cfg(target_os = "espidf")]
pub mod http;
