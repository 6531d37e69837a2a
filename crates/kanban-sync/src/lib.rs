pub mod board_page;
pub mod context;
pub mod debounce;
pub mod failure;
pub mod keys;
pub mod sidebar;
pub mod store;
pub mod task_editor;

pub use board_page::BoardPage;
pub use context::SyncContext;
pub use debounce::{DebounceScheduler, WritePhase};
pub use failure::{FailureReporter, Operation, SyncFailure};
pub use sidebar::Sidebar;
pub use store::{BoardLists, BoardStore};
pub use task_editor::TaskEditor;
