use serde::{Deserialize, Serialize};

/// A registered vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Identifier assigned by storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Body type, e.g. "Sedan" or "Pickup".
    pub vehicle_type: String,
    /// Manufacturer, e.g. "Toyota".
    pub manufacturer: String,
    /// Model name, e.g. "Corolla".
    pub model: String,
    /// Year of manufacture.
    pub model_year: i32,
    /// License plate as written on the vehicle.
    pub license_plate: String,
    /// Fuel type, e.g. "Petrol" or "Diesel".
    pub fuel_type: String,
    /// Odometer reading at registration or last edit.
    pub mileage: i32,
    /// Location of a photo of the vehicle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
}

impl Vehicle {
    /// Manufacturer and model joined for display, e.g. "Toyota Corolla".
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.manufacturer, self.model)
    }
}
