//! Element table entity
//!
//! One row per element keyed by `id`. Identities are assigned by the
//! writer, never by the database.

use sea_orm::{Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::model::Element;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "elements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Chemical sign, e.g. "H"
    #[sea_orm(nullable)]
    pub sign: Option<String>,
    #[sea_orm(nullable)]
    pub name: Option<String>,
    /// Periodic table group
    #[sea_orm(nullable)]
    pub position: Option<i32>,
    #[sea_orm(nullable)]
    pub molar_mass: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Element {
    fn from(model: Model) -> Self {
        Element {
            id: model.id,
            sign: model.sign,
            name: model.name,
            position: model.position.unwrap_or_default(),
            molar_mass: model.molar_mass.unwrap_or_default(),
        }
    }
}

impl From<&Element> for ActiveModel {
    fn from(element: &Element) -> Self {
        ActiveModel {
            id: Set(element.id),
            sign: Set(element.sign.clone()),
            name: Set(element.name.clone()),
            position: Set(Some(element.position)),
            molar_mass: Set(Some(element.molar_mass)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_columns_map_to_zero() {
        let model = Model {
            id: 9,
            sign: None,
            name: Some("Fluorine".to_string()),
            position: None,
            molar_mass: None,
        };
        let element = Element::from(model);
        assert_eq!(element.id, 9);
        assert_eq!(element.sign, None);
        assert_eq!(element.name.as_deref(), Some("Fluorine"));
        assert_eq!(element.position, 0);
        assert_eq!(element.molar_mass, 0.0);
    }

    #[test]
    fn test_element_to_active_model() {
        let element = Element::new(6, "C", "Carbon", 14, 12.011);
        let active = ActiveModel::from(&element);
        assert_eq!(active.id, Set(6));
        assert_eq!(active.sign, Set(Some("C".to_string())));
        assert_eq!(active.position, Set(Some(14)));
        assert_eq!(active.molar_mass, Set(Some(12.011)));
    }
}
