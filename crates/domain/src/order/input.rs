//! Order submission payload.

use serde::Deserialize;

use crate::validation::FieldErrors;

/// Fields a client submits to create an order.
///
/// Every field is optional at the type level so that missing values surface
/// as per-field validation messages instead of a generic parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOrderInput {
    pub store_id: Option<i64>,
    pub merchant_order_id: Option<String>,
    pub recipient_name: Option<String>,
    pub recipient_phone: Option<String>,
    pub recipient_address: Option<String>,
    pub special_instruction: Option<String>,
    pub item_quantity: Option<i32>,
    pub item_weight: Option<f64>,
    pub amount_to_collect: Option<f64>,
    pub item_description: Option<String>,
}

impl CreateOrderInput {
    /// Checks that every mandatory field is present and non-empty.
    ///
    /// Zero counts as missing for the numeric fields.
    pub fn validate_required(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.store_id.unwrap_or(0) == 0 {
            errors.required("store_id");
        }
        for (field, value) in [
            ("recipient_name", &self.recipient_name),
            ("recipient_phone", &self.recipient_phone),
            ("recipient_address", &self.recipient_address),
        ] {
            if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
                errors.required(field);
            }
        }
        if self.amount_to_collect.unwrap_or(0.0) == 0.0 {
            errors.required("amount_to_collect");
        }

        errors.into_result()
    }
}

/// Treats empty optional strings as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
