use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: String,
    pub cat_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub cat_name: String,
}

impl CreateCategory {
    pub fn validate(&self) -> Result<()> {
        validate_category_name(&self.cat_name)
    }
}

pub fn validate_category_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(AppError::Validation("Category name is required".into()));
    }
    if name.len() > 50 {
        return Err(AppError::Validation(
            "Category name cannot exceed 50 characters".into(),
        ));
    }
    Ok(())
}
