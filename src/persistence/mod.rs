pub mod config;
pub mod files;
pub mod metadata;
pub mod store;
pub mod task_store;

pub use config::{load_config, PlannerConfig};
pub use files::{
    atomic_write, config_file, ensure_planner_dir, init_local_planner, log_file, meta_file,
    report_file, storage_file,
};
pub use metadata::{load_metadata, save_metadata, AppMetadata};
pub use store::{FileStore, KeyValueStore, StoreError};
#[cfg(test)]
pub use store::MemoryStore;
pub use task_store::TaskStore;
