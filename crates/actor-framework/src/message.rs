//! # Generic Messages
//!
//! Message types exchanged between the `ResourceClient` and `ResourceActor`, plus the
//! [`Change`] events the actor publishes on its change feed.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// The variants map to the lifecycle of a stored record:
///
/// - **Create**: builds a new resource from [`ActorEntity::Create`].
/// - **Get**: fetches one resource by ID.
/// - **List**: snapshots every resource in the collection.
/// - **Update**: applies [`ActorEntity::Update`] to an existing resource.
/// - **Delete**: removes the resource.
/// - **Action**: runs a custom [`ActorEntity::Action`].
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

/// A committed change to the collection, published after the actor stores it.
#[derive(Debug, Clone)]
pub enum Change<T: ActorEntity> {
    Created(T),
    Updated(T),
    Deleted(T::Id),
}

impl<T: ActorEntity> Change<T> {
    /// ID of the record the change applies to.
    pub fn id(&self) -> &T::Id {
        match self {
            Change::Created(item) | Change::Updated(item) => item.id(),
            Change::Deleted(id) => id,
        }
    }

    /// The new state of the record, `None` after a delete.
    pub fn into_item(self) -> Option<T> {
        match self {
            Change::Created(item) | Change::Updated(item) => Some(item),
            Change::Deleted(_) => None,
        }
    }
}
