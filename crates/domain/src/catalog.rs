//! Fixed code tables for item and delivery types.

pub const ITEM_TYPE_DOCUMENT: i32 = 1;
pub const ITEM_TYPE_PARCEL: i32 = 2;

pub const DELIVERY_TYPE_ON_DEMAND: i32 = 12;
pub const DELIVERY_TYPE_NORMAL: i32 = 48;

/// Human-readable label for an item-type code.
pub fn item_type_label(code: i32) -> &'static str {
    match code {
        ITEM_TYPE_DOCUMENT => "Document",
        ITEM_TYPE_PARCEL => "Parcel",
        _ => "Unknown",
    }
}

/// Human-readable label for a delivery-type code.
pub fn delivery_type_label(code: i32) -> &'static str {
    match code {
        DELIVERY_TYPE_NORMAL => "Normal Delivery",
        DELIVERY_TYPE_ON_DEMAND => "On Demand Delivery",
        _ => "Unknown",
    }
}
