use thiserror::Error;

#[derive(Error, Debug)]
pub enum KanbanError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl KanbanError {
    /// Whether the failure came from talking to the remote service.
    ///
    /// A board deleted elsewhere but still referenced locally surfaces as
    /// `NotFound`, which is reported the same way as a transport failure.
    pub fn is_remote(&self) -> bool {
        matches!(self, KanbanError::Network(_) | KanbanError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_errors() {
        assert!(KanbanError::Network("refused".into()).is_remote());
        assert!(KanbanError::NotFound("board".into()).is_remote());
        assert!(!KanbanError::Validation("index".into()).is_remote());
    }

    #[test]
    fn test_display() {
        let err = KanbanError::NotFound("board abc".into());
        assert_eq!(err.to_string(), "Not found: board abc");
    }
}
