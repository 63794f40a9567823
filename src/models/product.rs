use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::error::{AppError, Result};

pub const DEFAULT_PRODUCT_IMAGE: &str = "https://example.com/default-product-image.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    Discontinued,
    OutOfStock,
}

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: String,
    pub pro_name: String,
    pub cat_id: String,
    pub pro_price: f64,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub status_product: ProductStatus,
    pub created_at: i64,
}

/// Product joined with its category name for list/detail responses.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    pub cat_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub pro_name: String,
    pub cat_id: String,
    pub pro_price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status_product: Option<ProductStatus>,
}

impl CreateProduct {
    pub fn validate(&self) -> Result<()> {
        if self.pro_name.is_empty() || self.pro_name.len() > 100 {
            return Err(AppError::Validation(
                "Product name is required and cannot exceed 100 characters".into(),
            ));
        }
        if self.pro_price < 0.0 {
            return Err(AppError::Validation("Price cannot be negative".into()));
        }
        if let Some(description) = &self.description {
            if description.len() > 500 {
                return Err(AppError::Validation(
                    "Description cannot exceed 500 characters".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub pro_name: Option<String>,
    pub cat_id: Option<String>,
    pub pro_price: Option<f64>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub status_product: Option<ProductStatus>,
}

impl UpdateProduct {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.pro_name {
            if name.is_empty() || name.len() > 100 {
                return Err(AppError::Validation(
                    "Product name is required and cannot exceed 100 characters".into(),
                ));
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

/// Best-effort product search; mirrors the order search conventions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductSearchQuery {
    pub q: Option<String>,
    pub cat_id: Option<String>,
    pub status_product: Option<ProductStatus>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<f64>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<f64>,
    #[serde(rename = "hasImage")]
    pub has_image: Option<bool>,
    #[serde(rename = "dateFrom")]
    pub date_from: Option<String>,
    #[serde(rename = "dateTo")]
    pub date_to: Option<String>,
}
