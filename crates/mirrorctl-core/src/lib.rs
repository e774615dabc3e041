// mirrorctl-core: App-state store and interaction layer between mirrorctl-api and consumers (CLI/TUI).

pub mod blacklist;
pub mod brightness;
pub mod config;
pub mod debounce;
pub mod error;
pub mod mirror;
pub mod model;
pub mod names;
pub mod store;
pub mod system;

// ── Primary re-exports ──────────────────────────────────────────────
pub use blacklist::{Blacklist, MODULE_BLACKLIST, is_module_blacklisted};
pub use brightness::{BrightnessControl, BrightnessState};
pub use config::MirrorConfig;
pub use debounce::Debouncer;
pub use error::CoreError;
pub use mirror::{Mirror, PendingOp, RefreshStatus, SuppressReport};
pub use model::AppState;
pub use names::normalize_module_name;
pub use store::{AppStateStore, FileStorage, MemoryStorage, STORAGE_KEY, StatePersistence};
pub use system::{SystemAction, SystemInfo};

// Re-export the API types consumers handle directly.
pub use mirrorctl_api::{ModuleDescriptor, ModuleListing};
