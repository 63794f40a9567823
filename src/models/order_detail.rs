use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// One line item of an order, also carrying optional buyer feedback.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    pub id: String,
    pub order_id: String,
    pub variant_id: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub feedback_details: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderDetail {
    pub order_id: String,
    pub variant_id: String,
    pub unit_price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub feedback_details: Option<String>,
}

impl CreateOrderDetail {
    pub fn validate(&self) -> Result<()> {
        if self.unit_price < 0.0 {
            return Err(AppError::Validation("Unit price cannot be negative".into()));
        }
        if self.quantity < 1 {
            return Err(AppError::Validation("Quantity must be at least 1".into()));
        }
        if let Some(feedback) = &self.feedback_details {
            if feedback.len() > 500 {
                return Err(AppError::Validation(
                    "Feedback cannot exceed 500 characters".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrderDetail {
    pub order_id: Option<String>,
    pub variant_id: Option<String>,
    pub unit_price: Option<f64>,
    pub quantity: Option<i64>,
    pub feedback_details: Option<String>,
}

impl UpdateOrderDetail {
    pub fn validate(&self) -> Result<()> {
        if let Some(price) = self.unit_price {
            if price < 0.0 {
                return Err(AppError::Validation("Unit price cannot be negative".into()));
            }
        }
        if let Some(quantity) = self.quantity {
            if quantity < 1 {
                return Err(AppError::Validation("Quantity must be at least 1".into()));
            }
        }
        Ok(())
    }
}

/// Filters for the feedback/detail search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderDetailSearchQuery {
    pub order_id: Option<String>,
    pub variant_id: Option<String>,
    pub pro_id: Option<String>,
    pub feedback: Option<String>,
    pub q: Option<String>,
}
