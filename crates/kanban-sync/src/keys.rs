//! Debounce keys, one per editable field per entity.

pub fn board_title(board_id: &str) -> String {
    format!("board:title:{}", board_id)
}

pub fn board_description(board_id: &str) -> String {
    format!("board:description:{}", board_id)
}

pub fn section_title(section_id: &str) -> String {
    format!("section:title:{}", section_id)
}

pub fn task_title(task_id: &str) -> String {
    format!("task:title:{}", task_id)
}

pub fn task_content(task_id: &str) -> String {
    format!("task:content:{}", task_id)
}
