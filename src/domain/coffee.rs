use serde::{Deserialize, Serialize};

pub type CoffeeId = i64;

/// A coffee from the catalog. Read-only from the ordering side.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Coffee {
    pub id: CoffeeId,
    pub name: String,
}
