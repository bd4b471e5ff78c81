use fxhash::FxHashMap;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use porter_optimizer::problem::capacity::Capacity;
use porter_optimizer::problem::skill::Skill;

/// Items above this weight need an agent with the `heavy` capability.
pub const HEAVY_ITEM_KG: f64 = 15.0;

/// Express lines are pulled forward by tightening their deadline, which
/// sequences them ahead of standard work on the same agent without extra
/// ordering variables.
pub const EXPRESS_MARGIN: SignedDuration = SignedDuration::from_mins(30);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub weight_kg: f64,
    pub volume_dm3: f64,
    pub fragile: bool,
    /// Named pick face on the warehouse grid.
    pub location: String,
    pub handling_duration: SignedDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Express,
    #[default]
    Standard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub deadline: Option<Timestamp>,
    pub priority: Priority,
    pub items: Vec<OrderItem>,
}

/// One expanded demand, ready to become an optimizer line once locations are
/// resolved against the grid.
#[derive(Debug, Clone)]
pub struct PickLine {
    pub external_id: String,
    pub order_id: String,
    pub product_id: String,
    pub location_name: String,
    pub quantity: u32,
    pub demand: Capacity,
    pub handling_duration: SignedDuration,
    pub deadline: Option<Timestamp>,
    pub required_skills: Vec<Skill>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("order {order_id} references unknown product '{product_id}'")]
    UnknownProduct {
        order_id: String,
        product_id: String,
    },
}

/// Capabilities an item demands from whoever picks it.
fn required_skills(product: &Product) -> Vec<Skill> {
    let mut skills = Vec::new();
    if product.fragile {
        skills.push(Skill::new("fragile"));
    }
    if product.weight_kg > HEAVY_ITEM_KG {
        skills.push(Skill::new("heavy"));
    }
    if product.category == "food" {
        skills.push(Skill::new("food"));
    }
    skills
}

fn effective_deadline(order: &Order) -> Option<Timestamp> {
    match (order.priority, order.deadline) {
        (Priority::Express, Some(deadline)) => Some(deadline - EXPRESS_MARGIN),
        (_, deadline) => deadline,
    }
}

/// Joins the order backlog with the catalog into pick lines: demand scaled by
/// quantity, handling scaled by quantity, skills derived from the product.
pub fn expand_orders(
    catalog: &[Product],
    orders: &[Order],
) -> Result<Vec<PickLine>, CatalogError> {
    let by_id: FxHashMap<&str, &Product> = catalog
        .iter()
        .map(|product| (product.id.as_str(), product))
        .collect();

    let mut lines = Vec::new();

    for order in orders {
        let deadline = effective_deadline(order);

        for item in &order.items {
            let product =
                *by_id
                    .get(item.product_id.as_str())
                    .ok_or_else(|| CatalogError::UnknownProduct {
                        order_id: order.id.clone(),
                        product_id: item.product_id.clone(),
                    })?;

            let quantity = item.quantity.max(1);
            lines.push(PickLine {
                external_id: format!("{}/{}", order.id, product.id),
                order_id: order.id.clone(),
                product_id: product.id.clone(),
                location_name: product.location.clone(),
                quantity,
                demand: Capacity::weight_and_volume(
                    product.weight_kg * quantity as f64,
                    product.volume_dm3 * quantity as f64,
                ),
                handling_duration: product.handling_duration * quantity as i32,
                deadline,
                required_skills: required_skills(product),
            });
        }
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, weight: f64, fragile: bool, category: &str) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_string(),
            category: category.to_string(),
            weight_kg: weight,
            volume_dm3: 2.0,
            fragile,
            location: format!("face-{id}"),
            handling_duration: SignedDuration::from_secs(60),
        }
    }

    #[test]
    fn test_expand_scales_demand_by_quantity() {
        let catalog = vec![product("p1", 3.0, false, "general")];
        let orders = vec![Order {
            id: "o1".to_string(),
            deadline: None,
            priority: Priority::Standard,
            items: vec![OrderItem {
                product_id: "p1".to_string(),
                quantity: 4,
            }],
        }];

        let lines = expand_orders(&catalog, &orders).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].demand.get(0), 12.0);
        assert_eq!(lines[0].demand.get(1), 8.0);
        assert_eq!(
            lines[0].handling_duration,
            SignedDuration::from_secs(240)
        );
    }

    #[test]
    fn test_skill_derivation() {
        let catalog = vec![
            product("light", 1.0, false, "general"),
            product("bulky", 20.0, false, "general"),
            product("glass", 2.0, true, "food"),
        ];
        let order = |id: &str| Order {
            id: id.to_string(),
            deadline: None,
            priority: Priority::Standard,
            items: vec![OrderItem {
                product_id: id.to_string(),
                quantity: 1,
            }],
        };

        let lines = expand_orders(
            &catalog,
            &[order("light"), order("bulky"), order("glass")],
        )
        .unwrap();

        assert!(lines[0].required_skills.is_empty());
        assert_eq!(lines[1].required_skills, vec![Skill::new("heavy")]);
        assert_eq!(
            lines[2].required_skills,
            vec![Skill::new("fragile"), Skill::new("food")]
        );
    }

    #[test]
    fn test_express_tightens_deadline() {
        let catalog = vec![product("p1", 1.0, false, "general")];
        let deadline: Timestamp = "2026-03-02T12:00:00Z".parse().unwrap();
        let orders = vec![Order {
            id: "o1".to_string(),
            deadline: Some(deadline),
            priority: Priority::Express,
            items: vec![OrderItem {
                product_id: "p1".to_string(),
                quantity: 1,
            }],
        }];

        let lines = expand_orders(&catalog, &orders).unwrap();
        assert_eq!(lines[0].deadline, Some(deadline - EXPRESS_MARGIN));
    }

    #[test]
    fn test_unknown_product_fails() {
        let orders = vec![Order {
            id: "o1".to_string(),
            deadline: None,
            priority: Priority::Standard,
            items: vec![OrderItem {
                product_id: "ghost".to_string(),
                quantity: 1,
            }],
        }];

        assert!(matches!(
            expand_orders(&[], &orders),
            Err(CatalogError::UnknownProduct { .. })
        ));
    }
}
