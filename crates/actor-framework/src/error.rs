//! # Framework Errors
//!
//! Error types shared by every actor and client built on the framework.

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("No free id after {0} attempts")]
    IdExhausted(usize),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the entity's own error type from an [`FrameworkError::EntityError`].
    ///
    /// Returns the original error untouched when it carries something else.
    pub fn downcast_entity<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(e) => Ok(*e),
                Err(other) => Err(FrameworkError::EntityError(other)),
            },
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn test_downcast_entity_recovers_domain_error() {
        let err = FrameworkError::EntityError(Box::new(Boom));
        assert_eq!(err.downcast_entity::<Boom>().unwrap(), Boom);
    }

    #[test]
    fn test_downcast_entity_keeps_other_errors() {
        let err = FrameworkError::NotFound("7".into());
        assert!(matches!(
            err.downcast_entity::<Boom>(),
            Err(FrameworkError::NotFound(id)) if id == "7"
        ));

        let err = FrameworkError::EntityError(Box::new(std::io::Error::other("io")));
        assert!(matches!(
            err.downcast_entity::<Boom>(),
            Err(FrameworkError::EntityError(_))
        ));
    }
}
