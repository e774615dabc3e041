// ── App-state store ──
//
// Id-keyed visibility records mirrored to a key-value persistence port.

mod app_state;
mod persistence;

pub use app_state::{AppStateStore, STORAGE_KEY};
pub use persistence::{FileStorage, MemoryStorage, StatePersistence};
