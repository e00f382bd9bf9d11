//! Member (staff record) input rules.

use serde::Deserialize;
use validator::Validate;

use crate::criteria::normalize_optional_text;
use crate::error::CoreError;
use crate::roles::Role;

/// Body for admin member creation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMember {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 200, message = "full_name must be 1-200 characters"))]
    pub full_name: String,
    pub role: Role,
    pub department: Option<String>,
}

/// Body for public self-registration. The role is always `staff`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Registration {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 200, message = "full_name must be 1-200 characters"))]
    pub full_name: String,
}

/// Body for admin member edits. A blank password means "unchanged"; a blank
/// department clears it. `is_active: false` locks the member out.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MemberChanges {
    #[validate(length(min = 1, max = 200, message = "full_name must be 1-200 characters"))]
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub department: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

impl NewMember {
    pub fn normalized(mut self) -> Result<Self, CoreError> {
        self.email = normalize_email(&self.email);
        self.full_name = self.full_name.trim().to_string();
        self.department = normalize_optional_text(self.department);
        self.validate()?;
        Ok(self)
    }
}

impl Registration {
    pub fn normalized(mut self) -> Result<Self, CoreError> {
        self.email = normalize_email(&self.email);
        self.full_name = self.full_name.trim().to_string();
        self.validate()?;
        Ok(self)
    }
}

impl MemberChanges {
    pub fn normalized(mut self) -> Result<Self, CoreError> {
        self.full_name = self.full_name.map(|n| n.trim().to_string());
        self.password = self.password.filter(|p| !p.trim().is_empty());
        self.validate()?;
        Ok(self)
    }

    /// The department value to store: `None` leaves it untouched,
    /// `Some(None)` clears it.
    pub fn department_update(&self) -> Option<Option<String>> {
        self.department
            .as_ref()
            .map(|d| normalize_optional_text(Some(d.clone())))
    }
}

/// Emails are matched case-insensitively, so they are stored lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
