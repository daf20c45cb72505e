use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Worker {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Worker {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Vehicle {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub license_plate: Option<String>,
}

impl Vehicle {
    pub fn display_name(&self) -> String {
        match self.license_plate.as_deref() {
            Some(plate) if !plate.is_empty() => format!("{} ({})", self.name, plate),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub equipment_type: Option<String>,
}
