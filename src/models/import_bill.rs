use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A stock purchase from a supplier.
#[derive(Debug, Clone, Serialize)]
pub struct ImportBill {
    pub id: String,
    pub create_date: i64,
    pub total_amount: f64,
    pub image_bill: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportBillDetail {
    pub id: String,
    pub bill_id: String,
    pub variant_id: String,
    pub quantity: i64,
    pub import_price: f64,
}

/// Running stock level for a variant, keyed to the bill that replenished it.
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseEntry {
    pub id: String,
    pub variant_id: String,
    pub bill_id: String,
    pub import_date: i64,
    pub inventory_number: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateImportBill {
    pub create_date: String,
    pub total_amount: f64,
    #[serde(default)]
    pub image_bill: Option<String>,
    #[serde(default)]
    pub details: Vec<CreateImportBillDetail>,
}

impl CreateImportBill {
    pub fn validate(&self) -> Result<()> {
        if self.total_amount <= 0.0 {
            return Err(AppError::Validation(
                "Total amount must be a positive number".into(),
            ));
        }
        for detail in &self.details {
            detail.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateImportBillDetail {
    pub variant_id: String,
    pub quantity: i64,
    pub import_price: f64,
}

impl CreateImportBillDetail {
    pub fn validate(&self) -> Result<()> {
        if self.quantity < 1 {
            return Err(AppError::Validation("Quantity must be at least 1".into()));
        }
        if self.import_price < 0.0 {
            return Err(AppError::Validation(
                "Import price cannot be negative".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportBillSearchQuery {
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    #[serde(rename = "minAmount")]
    pub min_amount: Option<f64>,
    #[serde(rename = "maxAmount")]
    pub max_amount: Option<f64>,
}
