//! Typed wrappers over the REST endpoints
//!
//! Each API borrows the HTTP client; nothing here caches or filters, the
//! server owns paging, search and transitions.

mod auth;
mod catalog;
mod documents;
mod notifications;
mod reports;

pub use auth::AuthApi;
pub use catalog::CatalogApi;
pub use documents::{ActionRequest, DocumentApi};
pub use notifications::NotificationApi;
pub use reports::ReportApi;

use serde::{Deserialize, Serialize};
use shared::response::OptionItem;
use std::collections::HashMap;

use crate::error::ClientResult;
use crate::http::HttpClient;

/// Dropdown option lists from `GET /<resource>/template`
///
/// Keys name the list (`suppliers`, `products`, `waiters`...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template(pub HashMap<String, Vec<OptionItem>>);

impl Template {
    pub fn options(&self, name: &str) -> &[OptionItem] {
        self.0.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Label for `value` in list `name`
    pub fn label(&self, name: &str, value: i64) -> Option<&str> {
        self.options(name)
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}

/// Fetch the option lists used by the create/edit form of `resource`
pub async fn fetch_template<C: HttpClient>(http: &C, resource: &str) -> ClientResult<Template> {
    http.get(&format!("{}/template", resource)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_lookup() {
        let json = r#"{"suppliers":[{"value":1,"label":"Fresh Farms"}],"products":[]}"#;
        let template: Template = serde_json::from_str(json).unwrap();
        assert_eq!(template.label("suppliers", 1), Some("Fresh Farms"));
        assert_eq!(template.label("suppliers", 2), None);
        assert!(template.options("departments").is_empty());
    }
}
