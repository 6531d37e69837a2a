pub mod board;
pub mod reorder;
pub mod route;
pub mod section;
pub mod task;
pub mod task_move;

pub use board::{Board, BoardId, BoardPatch};
pub use reorder::move_item;
pub use route::Route;
pub use section::{Section, SectionId, SectionPatch};
pub use task::{Task, TaskId, TaskPatch};
pub use task_move::{ResolvedTaskMove, TaskMove};
