//! [`ActorEntity`] implementation for [`Product`].

use super::{ProductAction, ProductActionResult, ProductError};
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use rust_decimal::Decimal;

fn check_price(price: Decimal) -> Result<(), ProductError> {
    if price <= Decimal::ZERO {
        return Err(ProductError::InvalidPrice(price));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Context = ();
    type Error = ProductError;

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, ProductError> {
        if params.name.trim().is_empty() {
            return Err(ProductError::EmptyName);
        }
        check_price(params.price)?;
        Ok(Product::new(id, params))
    }

    fn id(&self) -> &ProductId {
        &self.id
    }

    /// Handles updates to the Product entity.
    ///
    /// # Fields Updated
    /// - `name`: must stay non-empty
    /// - `price`: must stay positive
    /// - `category`
    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), ProductError> {
        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ProductError::EmptyName);
            }
            self.name = name.to_string();
        }
        if let Some(price) = update.price {
            check_price(price)?;
            self.price = price;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ProductAction,
        _ctx: &(),
    ) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::SetInStock(in_stock) => {
                self.in_stock = in_stock;
                Ok(ProductActionResult::SetInStock(self.clone()))
            }
            ProductAction::SetChefChoice(chef_choice) => {
                self.chef_choice = chef_choice;
                Ok(ProductActionResult::SetChefChoice(self.clone()))
            }
        }
    }
}
