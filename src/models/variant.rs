use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct ProductColor {
    pub id: String,
    pub color_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductColor {
    pub color_name: String,
}

impl CreateProductColor {
    pub fn validate(&self) -> Result<()> {
        if self.color_name.is_empty() || self.color_name.len() > 30 {
            return Err(AppError::Validation(
                "Color name is required and cannot exceed 30 characters".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductSize {
    pub id: String,
    pub size_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductSize {
    pub size_name: String,
}

impl CreateProductSize {
    pub fn validate(&self) -> Result<()> {
        if self.size_name.is_empty() || self.size_name.len() > 20 {
            return Err(AppError::Validation(
                "Size name is required and cannot exceed 20 characters".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductImage {
    pub id: String,
    pub pro_id: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductImage {
    pub pro_id: String,
    pub image_url: String,
}

/// A sellable combination of product, color, size and display image.
#[derive(Debug, Clone, Serialize)]
pub struct ProductVariant {
    pub id: String,
    pub pro_id: String,
    pub color_id: String,
    pub size_id: String,
    pub image_id: String,
}

/// Variant joined with the names of its referenced attributes.
#[derive(Debug, Clone, Serialize)]
pub struct VariantExpanded {
    #[serde(flatten)]
    pub variant: ProductVariant,
    pub pro_name: String,
    pub color_name: String,
    pub size_name: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVariant {
    pub pro_id: String,
    pub color_id: String,
    pub size_id: String,
    pub image_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVariant {
    pub pro_id: Option<String>,
    pub color_id: Option<String>,
    pub size_id: Option<String>,
    pub image_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariantFilter {
    pub pro_id: Option<String>,
    pub color_id: Option<String>,
    pub size_id: Option<String>,
}
