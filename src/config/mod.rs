//! Configuration.
//!
//! Tiers, lowest to highest priority, merged field by field:
//! 1. **Defaults** - `Config::default()`
//! 2. **Project** - `$CWD/todo-sync/config.yaml`
//! 3. **User** - `~/.todo-sync/config.yaml`
//! 4. **Environment**
//!
//! ## Environment Variables
//! - `TODO_SYNC_CONFIG_PATH` - Explicit config file (replaces project and user tiers)
//! - `TODO_SYNC_DB_PATH` - Database path
//! - `TODO_SYNC_REMOTE_URL` - Remote task list URL
//! - `TODO_SYNC_USER_DIR` - User config dir (default: `~/.todo-sync`)
//! - `TODO_SYNC_PROJECT_DIR` - Project config dir (default: `./todo-sync`)

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;
