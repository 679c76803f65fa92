//! # Courier Client
//!
//! High-level API for the `Courier` actor: roster queries and the workload sync used by
//! the dispatcher.
use crate::courier_actor::{CourierAction, CourierActionResult, CourierError};
use crate::model::{sort_roster, Courier, CourierCreate, CourierId, CourierUpdate};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct CourierClient {
    inner: ResourceClient<Courier>,
}

impl CourierClient {
    pub fn new(inner: ResourceClient<Courier>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Courier> for CourierClient {
    type Error = CourierError;

    fn inner(&self) -> &ResourceClient<Courier> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<CourierError>() {
            Ok(domain) => domain,
            Err(FrameworkError::NotFound(id)) => CourierError::NotFound(id),
            Err(other) => CourierError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl CourierClient {
    #[instrument(skip(self))]
    pub async fn create_courier(&self, params: CourierCreate) -> Result<CourierId, CourierError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_courier(
        &self,
        id: CourierId,
        update: CourierUpdate,
    ) -> Result<Courier, CourierError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Looks a courier up, turning a missing record into [`CourierError::NotFound`].
    pub async fn fetch(&self, id: CourierId) -> Result<Courier, CourierError> {
        self.get(id)
            .await?
            .ok_or_else(|| CourierError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn set_active(&self, id: CourierId, active: bool) -> Result<Courier, CourierError> {
        match self
            .inner
            .perform_action(id, CourierAction::SetActive(active))
            .await
        {
            Ok(CourierActionResult::SetActive(courier)) => Ok(courier),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn sync_workload(&self, id: CourierId, count: u32) -> Result<Courier, CourierError> {
        debug!("Syncing workload of {} to {}", id, count);
        match self
            .inner
            .perform_action(id, CourierAction::SyncWorkload(count))
            .await
        {
            Ok(CourierActionResult::SyncWorkload(courier)) => Ok(courier),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Active couriers, available first, then busy, then offline.
    #[instrument(skip(self))]
    pub async fn roster(&self) -> Result<Vec<Courier>, CourierError> {
        let mut couriers: Vec<Courier> = self
            .list()
            .await?
            .into_iter()
            .filter(|c| c.active)
            .collect();
        sort_roster(&mut couriers);
        Ok(couriers)
    }

    /// Couriers that can take a delivery right now.
    #[instrument(skip(self))]
    pub async fn available(&self) -> Result<Vec<Courier>, CourierError> {
        let roster = self.roster().await?;
        Ok(roster.into_iter().filter(Courier::is_assignable).collect())
    }
}

fn unexpected(result: CourierActionResult) -> CourierError {
    CourierError::ActorCommunicationError(format!("unexpected action result: {result:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_framework::mock::MockClient;
    use crate::model::CourierStatus;
    use chrono::Utc;

    fn courier(id: u32, status: CourierStatus, active: bool) -> Courier {
        let mut c = Courier::new(
            CourierId(id),
            CourierCreate {
                name: format!("Courier {id}"),
                phone: "+56987654321".into(),
            },
            Utc::now(),
        );
        c.status = status;
        c.active = active;
        c
    }

    #[tokio::test]
    async fn test_roster_hides_inactive_and_sorts() {
        let mut mock = MockClient::<Courier>::new();
        mock.expect_list().return_ok(vec![
            courier(1, CourierStatus::Offline, true),
            courier(2, CourierStatus::Busy, true),
            courier(3, CourierStatus::Available, false),
            courier(4, CourierStatus::Available, true),
        ]);
        mock.expect_list().return_ok(vec![
            courier(2, CourierStatus::Busy, true),
            courier(4, CourierStatus::Available, true),
        ]);
        let client = CourierClient::new(mock.client());

        let ids: Vec<CourierId> = client.roster().await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![CourierId(4), CourierId(2), CourierId(1)]);

        let available = client.available().await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, CourierId(4));

        mock.verify();
    }

    #[tokio::test]
    async fn test_fetch_missing_courier() {
        let mut mock = MockClient::<Courier>::new();
        mock.expect_get(CourierId(7)).return_ok(None);
        let client = CourierClient::new(mock.client());

        assert_eq!(
            client.fetch(CourierId(7)).await,
            Err(CourierError::NotFound("DP-7".into()))
        );
        mock.verify();
    }
}
