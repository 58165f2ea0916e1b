use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category: String,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            price,
            description: description.into(),
            category: category.into(),
        }
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}
