//! Pvz - Pickup point
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Product, Reception};

/// Pickup point where shipped goods are received
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pvz {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub city: String,
}

impl Pvz {
    /// Create a new PVZ with generated ID and timestamp
    pub fn new(city: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            city,
        }
    }
}

/// A reception together with the products scanned into it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceptionWithProducts {
    pub reception: Reception,
    pub products: Vec<Product>,
}

/// A PVZ together with its receptions, as returned by the paginated join
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PvzWithReceptions {
    pub pvz: Pvz,
    pub receptions: Vec<ReceptionWithProducts>,
}

/// One flat row of the PVZ -> Reception -> Product left join
#[derive(Debug, Clone)]
pub struct PvzJoinRow {
    pub pvz: Pvz,
    pub reception: Option<Reception>,
    pub product: Option<Product>,
}

impl PvzWithReceptions {
    /// Fold flat join rows into nested PVZ -> receptions -> products.
    ///
    /// Row order is preserved: PVZs, receptions and products appear in the
    /// order they are first seen.
    pub fn group(rows: impl IntoIterator<Item = PvzJoinRow>) -> Vec<PvzWithReceptions> {
        let mut grouped: Vec<PvzWithReceptions> = Vec::new();

        for row in rows {
            let entry = match grouped.iter().position(|g| g.pvz.id == row.pvz.id) {
                Some(idx) => &mut grouped[idx],
                None => {
                    grouped.push(PvzWithReceptions {
                        pvz: row.pvz,
                        receptions: Vec::new(),
                    });
                    let last = grouped.len() - 1;
                    &mut grouped[last]
                }
            };

            let Some(reception) = row.reception else {
                continue;
            };

            let slot = match entry
                .receptions
                .iter()
                .position(|r| r.reception.id == reception.id)
            {
                Some(idx) => &mut entry.receptions[idx],
                None => {
                    entry.receptions.push(ReceptionWithProducts {
                        reception,
                        products: Vec::new(),
                    });
                    let last = entry.receptions.len() - 1;
                    &mut entry.receptions[last]
                }
            };

            if let Some(product) = row.product {
                slot.products.push(product);
            }
        }

        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ProductType;

    #[test]
    fn test_group_nests_rows_in_order() {
        let first = Pvz::new("Москва".to_string());
        let second = Pvz::new("Казань".to_string());
        let reception = Reception::new(first.id);
        let p1 = Product::new(reception.id, ProductType::Shoes);
        let p2 = Product::new(reception.id, ProductType::Clothing);

        let rows = vec![
            PvzJoinRow {
                pvz: first.clone(),
                reception: Some(reception.clone()),
                product: Some(p1.clone()),
            },
            PvzJoinRow {
                pvz: first.clone(),
                reception: Some(reception.clone()),
                product: Some(p2.clone()),
            },
            PvzJoinRow {
                pvz: second.clone(),
                reception: None,
                product: None,
            },
        ];

        let grouped = PvzWithReceptions::group(rows);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].pvz.id, first.id);
        assert_eq!(grouped[0].receptions.len(), 1);
        assert_eq!(grouped[0].receptions[0].products, vec![p1, p2]);
        assert_eq!(grouped[1].pvz.id, second.id);
        assert!(grouped[1].receptions.is_empty());
    }

    #[test]
    fn test_group_keeps_empty_receptions() {
        let pvz = Pvz::new("Казань".to_string());
        let reception = Reception::new(pvz.id);

        let grouped = PvzWithReceptions::group(vec![PvzJoinRow {
            pvz,
            reception: Some(reception),
            product: None,
        }]);

        assert_eq!(grouped[0].receptions.len(), 1);
        assert!(grouped[0].receptions[0].products.is_empty());
    }
}
