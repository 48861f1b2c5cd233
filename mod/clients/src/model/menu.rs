use serde::{Deserialize, Serialize};

/// One line of a feeding menu, referencing an inventory ingredient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub ingredient_id: String,
    pub quantity: f64,
    pub unit: String,
}

/// Menu — a feeding plan for a client, with embedded ingredient lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    /// Owning client id.
    pub client_id: String,

    pub name: String,

    /// Ingredient lines, stored inline with the menu document.
    #[serde(default)]
    pub items: Vec<MenuItem>,

    /// Daily portion in grams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_portion_g: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_items_embed_in_document() {
        let m = Menu {
            id: "menu001".into(),
            client_id: "client001".into(),
            name: "Rex weekly".into(),
            items: vec![MenuItem {
                ingredient_id: "ing001".into(),
                quantity: 2.5,
                unit: "kg".into(),
            }],
            daily_portion_g: Some(350.0),
            notes: None,
            created_at: None,
            updated_at: None,
        };
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"ingredientId\":\"ing001\""));
        let back: Menu = serde_json::from_str(&json).unwrap();
        assert_eq!(back.items.len(), 1);
    }
}
