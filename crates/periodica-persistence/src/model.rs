//! Domain model types for the persistence layer
//!
//! `Element` is the only record. It is serialized to the JSON document with
//! the keys `id`, `sign`, `name`, `position` and `molarMass`; the relational
//! side uses the `elements` table (see [`crate::entity::element`]).

use periodica_common::PeriodicaError;
use serde::{Deserialize, Deserializer, Serialize};

/// A chemical element record.
///
/// No validation happens on construction: `sign` and `name` may be empty or
/// absent. An `id` of `0` asks the writer to assign the next identity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i32,
    #[serde(default)]
    pub sign: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub molar_mass: f64,
}

impl Element {
    pub fn new(id: i32, sign: &str, name: &str, position: i32, molar_mass: f64) -> Self {
        Self {
            id,
            sign: Some(sign.to_string()),
            name: Some(name.to_string()),
            position,
            molar_mass,
        }
    }

    /// True when the caller left identity assignment to the store.
    pub fn needs_identity(&self) -> bool {
        self.id == 0
    }
}

/// Maps an explicit JSON `null` to the type's zero value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page of elements plus the size of the whole collection
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPage {
    pub items: Vec<Element>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

impl ElementPage {
    pub fn new(items: Vec<Element>, total: u64, page: u64, page_size: u64) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
        }
    }

    /// Slices an in-memory collection. `page` is 1-based.
    pub fn from_collection(elements: Vec<Element>, page: u64, page_size: u64) -> Self {
        let total = elements.len() as u64;
        let skip = usize::try_from(page.saturating_sub(1).saturating_mul(page_size))
            .unwrap_or(usize::MAX);
        let take = usize::try_from(page_size).unwrap_or(usize::MAX);
        let items = elements.into_iter().skip(skip).take(take).collect();
        Self::new(items, total, page, page_size)
    }
}

/// Backend of record selected by the `source` request value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageMode {
    /// The JSON document (default)
    #[default]
    Json,
    /// The relational table
    Db,
}

impl StorageMode {
    /// Anything other than `db` (case-insensitive) selects the JSON document.
    pub fn from_source(source: Option<&str>) -> Self {
        match source {
            Some(s) if s.trim().eq_ignore_ascii_case("db") => StorageMode::Db,
            _ => StorageMode::Json,
        }
    }
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMode::Json => write!(f, "json"),
            StorageMode::Db => write!(f, "db"),
        }
    }
}

/// `max(id) + 1`, or `1` for an empty collection. Gaps are never reused.
pub fn next_identity(elements: &[Element]) -> anyhow::Result<i32> {
    identity_after(elements.iter().map(|e| e.id).max())
}

/// The identity following `max`, failing once `i32::MAX` is taken
pub fn identity_after(max: Option<i32>) -> anyhow::Result<i32> {
    let Some(next) = max.unwrap_or(0).checked_add(1) else {
        return Err(PeriodicaError::IllegalArgument("identity space exhausted".to_string()).into());
    };
    Ok(next)
}

/// Seed collection served when the JSON document is missing, corrupt or empty
pub fn fallback_elements() -> Vec<Element> {
    vec![
        Element::new(1, "H", "Hydrogen", 1, 1.008),
        Element::new(2, "He", "Helium", 18, 4.0026),
        Element::new(3, "Li", "Lithium", 1, 6.94),
        Element::new(4, "Be", "Beryllium", 2, 9.0122),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_document_keys() {
        let element = Element::new(1, "H", "Hydrogen", 1, 1.008);
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["sign"], "H");
        assert_eq!(json["name"], "Hydrogen");
        assert_eq!(json["position"], 1);
        assert_eq!(json["molarMass"], 1.008);
    }

    #[test]
    fn test_element_missing_and_null_fields_default() {
        let element: Element =
            serde_json::from_str(r#"{"sign":"O","position":null,"molarMass":null}"#).unwrap();
        assert_eq!(element.id, 0);
        assert_eq!(element.sign.as_deref(), Some("O"));
        assert_eq!(element.name, None);
        assert_eq!(element.position, 0);
        assert_eq!(element.molar_mass, 0.0);
        assert!(element.needs_identity());
    }

    #[test]
    fn test_element_accepts_empty_strings() {
        let element: Element = serde_json::from_str(r#"{"id":7,"sign":"","name":""}"#).unwrap();
        assert_eq!(element.sign.as_deref(), Some(""));
        assert_eq!(element.name.as_deref(), Some(""));
        assert!(!element.needs_identity());
    }

    #[test]
    fn test_next_identity() {
        assert_eq!(next_identity(&[]).unwrap(), 1);

        let gapped: Vec<Element> = [1, 2, 4]
            .iter()
            .map(|id| Element {
                id: *id,
                ..Default::default()
            })
            .collect();
        assert_eq!(next_identity(&gapped).unwrap(), 5);
    }

    #[test]
    fn test_next_identity_exhausted() {
        let last = Element {
            id: i32::MAX,
            ..Default::default()
        };
        let err = next_identity(&[last]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PeriodicaError>(),
            Some(PeriodicaError::IllegalArgument(_))
        ));
        assert_eq!(identity_after(Some(i32::MAX - 1)).unwrap(), i32::MAX);
    }

    #[test]
    fn test_page_from_collection() {
        let page = ElementPage::from_collection(fallback_elements(), 2, 3);
        assert_eq!(page.total, 4);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].sign.as_deref(), Some("Be"));

        let past_end = ElementPage::from_collection(fallback_elements(), 5, 10);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 4);
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = ElementPage::new(vec![], 0, 1, 10);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pageSize"], 10);
        assert!(json["items"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_storage_mode_from_source() {
        assert_eq!(StorageMode::from_source(Some("db")), StorageMode::Db);
        assert_eq!(StorageMode::from_source(Some("DB")), StorageMode::Db);
        assert_eq!(StorageMode::from_source(Some("json")), StorageMode::Json);
        assert_eq!(StorageMode::from_source(Some("xml")), StorageMode::Json);
        assert_eq!(StorageMode::from_source(None), StorageMode::Json);
        assert_eq!(StorageMode::Db.to_string(), "db");
    }

    #[test]
    fn test_fallback_elements() {
        let seed = fallback_elements();
        assert_eq!(seed.len(), 4);
        assert_eq!(
            seed.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(seed[1].name.as_deref(), Some("Helium"));
        assert_eq!(seed[1].position, 18);
    }
}
