//! # Product Client
//!
//! Provides a high‑level API for interacting with the `Product` actor.
//! It wraps a `ResourceClient<Product>` and exposes catalog-specific methods.
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<ProductError>() {
            Ok(domain) => domain,
            Err(FrameworkError::NotFound(id)) => ProductError::NotFound(id),
            Err(other) => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ProductError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// The whole catalog, grouped by category and then by name.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        let mut products = self.list().await?;
        products.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(products)
    }

    /// In-stock products featured as chef's choice.
    #[instrument(skip(self))]
    pub async fn chef_choices(&self) -> Result<Vec<Product>, ProductError> {
        let products = self.list_products().await?;
        Ok(products
            .into_iter()
            .filter(|p| p.chef_choice && p.in_stock)
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn set_in_stock(&self, id: ProductId, in_stock: bool) -> Result<Product, ProductError> {
        debug!("Setting stock flag for {} to {}", id, in_stock);
        match self
            .inner
            .perform_action(id, ProductAction::SetInStock(in_stock))
            .await
        {
            Ok(ProductActionResult::SetInStock(product)) => Ok(product),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_chef_choice(
        &self,
        id: ProductId,
        chef_choice: bool,
    ) -> Result<Product, ProductError> {
        match self
            .inner
            .perform_action(id, ProductAction::SetChefChoice(chef_choice))
            .await
        {
            Ok(ProductActionResult::SetChefChoice(product)) => Ok(product),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(Self::map_error(e)),
        }
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("unexpected action result: {result:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_framework::mock::{create_mock_client, expect_action, expect_list};
    use rust_decimal::Decimal;

    fn product(id: u32, name: &str, category: &str) -> Product {
        Product::new(
            ProductId(id),
            ProductCreate::new(name, Decimal::from(5000), category),
        )
    }

    #[tokio::test]
    async fn test_set_in_stock_sends_action() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let task =
            tokio::spawn(async move { product_client.set_in_stock(ProductId(1), false).await });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, ProductId(1));
        assert!(matches!(action, ProductAction::SetInStock(false)));

        let mut sold_out = product(1, "Gyoza", "Starters");
        sold_out.in_stock = false;
        responder
            .send(Ok(ProductActionResult::SetInStock(sold_out)))
            .unwrap();

        let result = task.await.unwrap().unwrap();
        assert!(!result.in_stock);
    }

    #[tokio::test]
    async fn test_entity_error_is_recovered() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let task =
            tokio::spawn(async move { product_client.set_chef_choice(ProductId(9), true).await });

        let (_, _, responder) = expect_action(&mut receiver).await.unwrap();
        responder
            .send(Err(FrameworkError::NotFound("product_9".into())))
            .unwrap();

        assert_eq!(
            task.await.unwrap(),
            Err(ProductError::NotFound("product_9".into()))
        );
    }

    #[tokio::test]
    async fn test_chef_choices_filters_and_sorts() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let task = tokio::spawn(async move { product_client.chef_choices().await });

        let mut featured = product(1, "Sake Roll", "Rolls");
        featured.chef_choice = true;
        let mut featured_sold_out = product(2, "Ebi Roll", "Rolls");
        featured_sold_out.chef_choice = true;
        featured_sold_out.in_stock = false;
        let mut starter = product(3, "Gyoza", "Starters");
        starter.chef_choice = true;
        let plain = product(4, "Miso", "Soups");

        let responder = expect_list(&mut receiver).await.unwrap();
        responder
            .send(Ok(vec![starter, plain, featured_sold_out, featured]))
            .unwrap();

        let names: Vec<String> = task
            .await
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Sake Roll", "Gyoza"]);
    }
}
