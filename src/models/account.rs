use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::error::{AppError, Result};
use crate::util::is_valid_email;

pub const DEFAULT_PROFILE_IMAGE: &str = "https://example.com/default-profile-image.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Manager,
}

impl Role {
    /// Admin and manager may act on resources they do not own.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
    Suspended,
}

#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Argon2 hash; never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub image: String,
    pub role: Role,
    pub acc_status: AccountStatus,
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccount {
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub password: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub acc_status: Option<AccountStatus>,
}

impl CreateAccount {
    pub fn validate(&self) -> Result<()> {
        if self.username.len() < 3 || self.username.len() > 30 {
            return Err(AppError::Validation(
                "Username must be between 3 and 30 characters".into(),
            ));
        }
        if self.name.is_empty() || self.name.len() > 50 {
            return Err(AppError::Validation(
                "Name is required and cannot exceed 50 characters".into(),
            ));
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::Validation("Invalid email address".into()));
        }
        validate_phone(&self.phone)?;
        if self.address.is_empty() || self.address.len() > 100 {
            return Err(AppError::Validation(
                "Address is required and cannot exceed 100 characters".into(),
            ));
        }
        if self.password.len() < 8 {
            return Err(AppError::Validation(
                "Password must be at least 8 characters long".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccount {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub image: Option<String>,
    pub role: Option<Role>,
    pub acc_status: Option<AccountStatus>,
}

impl UpdateAccount {
    pub fn validate(&self) -> Result<()> {
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                return Err(AppError::Validation("Invalid email address".into()));
            }
        }
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

pub fn validate_phone(phone: &str) -> Result<()> {
    if phone.len() != 10 || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Phone number must be exactly 10 digits".into(),
        ));
    }
    Ok(())
}
