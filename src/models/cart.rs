use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// One line in an account's cart. `total_price` is always recomputed
/// server-side as quantity x unit price.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub id: String,
    pub acc_id: String,
    pub variant_id: String,
    pub pro_quantity: i64,
    pub pro_price: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCartItem {
    pub acc_id: String,
    pub variant_id: String,
    pub pro_quantity: i64,
    pub pro_price: f64,
}

impl CreateCartItem {
    pub fn validate(&self) -> Result<()> {
        if self.pro_quantity < 1 {
            return Err(AppError::Validation("Quantity must be at least 1".into()));
        }
        if self.pro_price < 0.0 {
            return Err(AppError::Validation("Price cannot be negative".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCartItem {
    pub pro_quantity: Option<i64>,
    pub pro_price: Option<f64>,
}

impl UpdateCartItem {
    pub fn validate(&self) -> Result<()> {
        if let Some(quantity) = self.pro_quantity {
            if quantity < 1 {
                return Err(AppError::Validation("Quantity must be at least 1".into()));
            }
        }
        if let Some(price) = self.pro_price {
            if price < 0.0 {
                return Err(AppError::Validation("Price cannot be negative".into()));
            }
        }
        Ok(())
    }
}
