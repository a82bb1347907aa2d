//! Domain core: the rumor model, the guarded registry, and the port traits
//! everything else plugs into.

pub mod ports;
pub mod registry;
pub mod rumor;

pub use registry::RumorRegistry;
pub use rumor::{Rumor, RumorDraft, RumorPatch};
