//! Save/load persistence with integrity verification
//!
//! Features:
//! - Signed best-score envelope (tamper detection, not encryption)
//! - Pluggable storage (LocalStorage, files, memory)
//! - Cloud-first saves with local fallback
//! - Corrupt or forged saves are ignored, never fatal

pub mod integrity;
pub mod save;
pub mod storage;

pub use integrity::{IntegrityError, ScorePayload, create_payload, validate_payload};
pub use save::{SaveManager, SaveTarget};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
