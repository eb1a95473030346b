//! ProductType - Category of a scanned item

use serde::{Deserialize, Serialize};

/// Product category.
///
/// Wire and storage names are Russian; English names are accepted on input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProductType {
    #[serde(rename = "электроника", alias = "electronics")]
    Electronics,
    #[serde(rename = "одежда", alias = "clothing")]
    Clothing,
    #[serde(rename = "обувь", alias = "shoes")]
    Shoes,
}

impl ProductType {
    pub const ALL: [ProductType; 3] = [
        ProductType::Electronics,
        ProductType::Clothing,
        ProductType::Shoes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Electronics => "электроника",
            ProductType::Clothing => "одежда",
            ProductType::Shoes => "обувь",
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "электроника" | "electronics" => Ok(ProductType::Electronics),
            "одежда" | "clothing" => Ok(ProductType::Clothing),
            "обувь" | "shoes" => Ok(ProductType::Shoes),
            _ => Err(format!("Unknown product type: {}", s)),
        }
    }
}
