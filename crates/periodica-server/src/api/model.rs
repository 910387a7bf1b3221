//! Request and response types for the element API

use serde::{Deserialize, Serialize};

/// Query string for `GET /elements`
///
/// Paging values are taken as signed so that zero and negative input can be
/// clamped instead of rejected.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementQuery {
    pub source: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveAllResponse {
    pub saved: usize,
}
