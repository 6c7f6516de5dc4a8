//! Site-wide settings: social links, contact address, wholesale threshold.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::wire;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub facebook: String,
    pub instagram: String,
    pub whatsapp: String,
    pub contact_us_email: String,
    /// Minimum quantity from which wholesale pricing applies.
    pub wholesale_at: u32,
}

impl SiteSettings {
    /// Decode leniently; missing or malformed fields become `""` / `0`.
    pub fn from_wire(raw: &Value) -> Self {
        let s = wire::unwrap_envelope(raw);
        let text = |key: &str| wire::field(s, key).and_then(wire::text).unwrap_or_default();
        Self {
            facebook: text("facebook"),
            instagram: text("instagram"),
            whatsapp: text("whatsapp"),
            contact_us_email: text("contact_us_email"),
            wholesale_at: wire::field(s, "wholesale_at")
                .and_then(wire::whole)
                .unwrap_or(0),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.contact_us_email.is_empty() && !self.contact_us_email.validate_email() {
            return Err(CoreError::Validation(format!(
                "'{}' is not a valid email address",
                self.contact_us_email
            )));
        }
        Ok(())
    }
}
