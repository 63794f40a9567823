use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::error::{AppError, Result};
use crate::models::validate_phone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PayStatus {
    Unpaid,
    Paid,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShippingStatus {
    NotShipped,
    InTransit,
    Delivered,
}

/// One purchase. `total_price` is the authoritative amount checked against
/// gateway callbacks; only the callback reconciler writes `pay_status` once
/// payment is underway.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: String,
    pub acc_id: String,
    pub order_date: i64,
    pub address_receive: String,
    pub phone: String,
    pub total_price: f64,
    pub order_status: OrderStatus,
    pub pay_status: PayStatus,
    pub shipping_status: ShippingStatus,
    pub feedback_order: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    pub acc_id: String,
    pub address_receive: String,
    pub phone: String,
    pub total_price: f64,
    #[serde(default)]
    pub order_status: Option<OrderStatus>,
    #[serde(default)]
    pub pay_status: Option<PayStatus>,
    #[serde(default)]
    pub shipping_status: Option<ShippingStatus>,
    #[serde(default)]
    pub feedback_order: Option<String>,
}

impl CreateOrder {
    pub fn validate(&self) -> Result<()> {
        if self.address_receive.is_empty() || self.address_receive.len() > 100 {
            return Err(AppError::Validation(
                "Address is required and cannot exceed 100 characters".into(),
            ));
        }
        validate_phone(&self.phone)?;
        if self.total_price < 0.0 {
            return Err(AppError::Validation("Total price cannot be negative".into()));
        }
        if let Some(feedback) = &self.feedback_order {
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
pub struct UpdateOrder {
    pub acc_id: Option<String>,
    pub address_receive: Option<String>,
    pub phone: Option<String>,
    pub total_price: Option<f64>,
    pub order_status: Option<OrderStatus>,
    pub pay_status: Option<PayStatus>,
    pub shipping_status: Option<ShippingStatus>,
    pub feedback_order: Option<String>,
}

impl UpdateOrder {
    pub fn validate(&self) -> Result<()> {
        if let Some(address) = &self.address_receive {
            if address.is_empty() || address.len() > 100 {
                return Err(AppError::Validation(
                    "Address is required and cannot exceed 100 characters".into(),
                ));
            }
        }
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        if let Some(price) = self.total_price {
            if price < 0.0 {
                return Err(AppError::Validation("Total price cannot be negative".into()));
            }
        }
        if let Some(feedback) = &self.feedback_order {
            if feedback.len() > 500 {
                return Err(AppError::Validation(
                    "Feedback cannot exceed 500 characters".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Best-effort order search. Filters that fail to parse are ignored rather
/// than rejected; the free-text token is matched against status fields,
/// address, phone, a literal id, and a `YYYY-MM-DD`-shaped day range.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderSearchQuery {
    pub q: Option<String>,
    pub acc_id: Option<String>,
    pub order_status: Option<OrderStatus>,
    pub pay_status: Option<PayStatus>,
    pub shipping_status: Option<ShippingStatus>,
    #[serde(rename = "dateFrom")]
    pub date_from: Option<String>,
    #[serde(rename = "dateTo")]
    pub date_to: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<f64>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<f64>,
}
