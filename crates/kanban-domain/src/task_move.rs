use kanban_core::{KanbanError, KanbanResult};
use serde::{Deserialize, Serialize};

use crate::section::{Section, SectionId};
use crate::task::TaskId;

/// A task dropped from one position to another, possibly across sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMove {
    pub source_section: SectionId,
    pub source_index: usize,
    pub destination_section: SectionId,
    pub destination_index: usize,
}

/// Full task order of both sections touched by a move.
///
/// The server replaces each section's order with these lists wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTaskMove {
    #[serde(rename = "resourceSectionId")]
    pub source_section: SectionId,
    #[serde(rename = "resourceList")]
    pub source_tasks: Vec<TaskId>,
    #[serde(rename = "destinationSectionId")]
    pub destination_section: SectionId,
    #[serde(rename = "destinationList")]
    pub destination_tasks: Vec<TaskId>,
}

impl TaskMove {
    pub fn within(section: impl Into<SectionId>, from: usize, to: usize) -> Self {
        let section = section.into();
        Self {
            source_section: section.clone(),
            source_index: from,
            destination_section: section,
            destination_index: to,
        }
    }

    pub fn is_same_section(&self) -> bool {
        self.source_section == self.destination_section
    }

    /// Splice the task into place and report the resulting orders.
    pub fn apply(&self, sections: &mut [Section]) -> KanbanResult<ResolvedTaskMove> {
        let source_pos = position_of(sections, &self.source_section)?;
        let destination_pos = position_of(sections, &self.destination_section)?;

        if self.is_same_section() {
            let tasks = &mut sections[source_pos].tasks;
            crate::reorder::move_item(tasks, self.source_index, self.destination_index)?;
            let order: Vec<TaskId> = tasks.iter().map(|t| t.id.clone()).collect();
            return Ok(ResolvedTaskMove {
                source_section: self.source_section.clone(),
                source_tasks: order.clone(),
                destination_section: self.destination_section.clone(),
                destination_tasks: order,
            });
        }

        let source_len = sections[source_pos].tasks.len();
        let destination_len = sections[destination_pos].tasks.len();
        if self.source_index >= source_len || self.destination_index > destination_len {
            return Err(KanbanError::Validation(format!(
                "cannot move task {} of {} to {} of {}",
                self.source_index, source_len, self.destination_index, destination_len
            )));
        }

        let mut task = sections[source_pos].tasks.remove(self.source_index);
        task.section = Some(self.destination_section.clone());
        sections[destination_pos]
            .tasks
            .insert(self.destination_index, task);

        Ok(ResolvedTaskMove {
            source_section: self.source_section.clone(),
            source_tasks: sections[source_pos].task_ids(),
            destination_section: self.destination_section.clone(),
            destination_tasks: sections[destination_pos].task_ids(),
        })
    }
}

fn position_of(sections: &[Section], id: &str) -> KanbanResult<usize> {
    sections
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| KanbanError::NotFound(format!("section {}", id)))
}
