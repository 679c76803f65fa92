use actor_framework::{ActorEntity, Change, FrameworkError, ResourceActor};
use async_trait::async_trait;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Booking {
    id: u32,
    guest: String,
    seated: bool,
}

#[derive(Debug)]
struct BookingCreate {
    guest: String,
}

#[derive(Debug)]
struct BookingUpdate {
    guest: Option<String>,
}

#[derive(Debug)]
enum BookingAction {
    Seat,
    IsSeated,
}

#[derive(Debug, thiserror::Error)]
enum BookingError {
    #[error("Guest name is empty")]
    EmptyGuest,
}

#[async_trait]
impl ActorEntity for Booking {
    type Id = u32;
    type Create = BookingCreate;
    type Update = BookingUpdate;
    type Action = BookingAction;
    type ActionResult = bool;
    type Context = ();
    type Error = BookingError;

    fn from_create_params(id: u32, params: BookingCreate) -> Result<Self, Self::Error> {
        if params.guest.is_empty() {
            return Err(BookingError::EmptyGuest);
        }
        Ok(Self {
            id,
            guest: params.guest,
            seated: false,
        })
    }

    fn id(&self) -> &u32 {
        &self.id
    }

    async fn on_update(
        &mut self,
        update: BookingUpdate,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        if let Some(guest) = update.guest {
            if guest.is_empty() {
                return Err(BookingError::EmptyGuest);
            }
            self.guest = guest;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: BookingAction,
        _ctx: &Self::Context,
    ) -> Result<bool, Self::Error> {
        match action {
            BookingAction::Seat => {
                if self.seated {
                    Ok(false)
                } else {
                    self.seated = true;
                    Ok(true)
                }
            }
            BookingAction::IsSeated => Ok(self.seated),
        }
    }

    fn is_query(action: &BookingAction) -> bool {
        matches!(action, BookingAction::IsSeated)
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::<Booking>::new(10);
    tokio::spawn(actor.run(()));

    // 1. Create
    let id: u32 = client
        .create(BookingCreate {
            guest: "Alice".into(),
        })
        .await
        .unwrap();
    assert_eq!(id, 1);

    // 2. Action
    let changed = client.perform_action(id, BookingAction::Seat).await.unwrap();
    assert!(changed);
    let booking: Booking = client.get(id).await.unwrap().unwrap();
    assert!(booking.seated);

    let changed_again = client.perform_action(id, BookingAction::Seat).await.unwrap();
    assert!(!changed_again);

    // 3. Update
    let updated = client
        .update(
            id,
            BookingUpdate {
                guest: Some("Bob".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.guest, "Bob");

    // 4. List
    assert_eq!(client.list().await.unwrap().len(), 1);

    // 5. Delete
    client.delete(id).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
    assert!(matches!(
        client.delete(id).await,
        Err(FrameworkError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_failed_update_leaves_record_untouched() {
    let (actor, client) = ResourceActor::<Booking>::new(10);
    tokio::spawn(actor.run(()));

    let id = client
        .create(BookingCreate {
            guest: "Carla".into(),
        })
        .await
        .unwrap();

    let err = client
        .update(
            id,
            BookingUpdate {
                guest: Some(String::new()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_entity::<BookingError>(),
        Ok(BookingError::EmptyGuest)
    ));

    let booking: Booking = client.get(id).await.unwrap().unwrap();
    assert_eq!(booking.guest, "Carla");
}

#[tokio::test]
async fn test_change_feed_skips_queries() {
    let (actor, client) = ResourceActor::<Booking>::new(10);
    tokio::spawn(actor.run(()));
    let mut changes = client.subscribe();

    let id = client
        .create(BookingCreate {
            guest: "Dana".into(),
        })
        .await
        .unwrap();
    client
        .perform_action(id, BookingAction::IsSeated)
        .await
        .unwrap();
    client.perform_action(id, BookingAction::Seat).await.unwrap();
    client.delete(id).await.unwrap();

    assert!(matches!(changes.recv().await.unwrap(), Change::Created(b) if b.guest == "Dana"));
    assert!(matches!(changes.recv().await.unwrap(), Change::Updated(b) if b.seated));
    assert!(matches!(changes.recv().await.unwrap(), Change::Deleted(1)));
}

#[tokio::test]
async fn test_custom_ids_retry_on_collision() {
    let mut ids = vec![7u32, 7, 7, 9].into_iter();
    let (actor, client) =
        ResourceActor::<Booking>::with_id_generator(10, move || ids.next().unwrap_or(0));
    tokio::spawn(actor.with_id_attempts(2).run(()));

    let first = client
        .create(BookingCreate { guest: "A".into() })
        .await
        .unwrap();
    assert_eq!(first, 7);

    // Two attempts, both collide with 7.
    let second = client.create(BookingCreate { guest: "B".into() }).await;
    assert!(matches!(second, Err(FrameworkError::IdExhausted(2))));

    let third = client
        .create(BookingCreate { guest: "C".into() })
        .await
        .unwrap();
    assert_eq!(third, 9);
}
