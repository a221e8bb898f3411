//! Built-in apps
//!
//! - `default`: graph-backed panels (`show-app`, `select-panel`)
//! - `trek`: a small real-time game layered over the defaults
//! - `dream`: two static pages exercising click actions and selectors
//!
//! An instance addresses an app with `<instance>:<app>`; unknown app names
//! fall back to the default table.

pub mod dream;
pub mod panels;
pub mod trek;

pub use dream::{DreamAction, DreamApp};
pub use panels::PanelAction;
pub use trek::{TrekAction, TrekApp};

use crate::dispatch::{AppCatalog, HandlerTable};

/// Catalog with the default table and every built-in app registered.
pub fn catalog() -> AppCatalog {
    let mut catalog = AppCatalog::new(HandlerTable::from_kinds::<PanelAction>());
    catalog.register(TrekApp);
    catalog.register(DreamApp);
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catalog_merges_app_tables() {
        let catalog = catalog();
        assert_eq!(catalog.app_names(), vec!["dream", "trek"]);

        let trek = catalog.table("trek").await;
        assert_eq!(
            trek.names(),
            vec!["select-panel", "set-course", "show-app", "trek-start", "trek-status"]
        );

        let dream = catalog.table("dream").await;
        assert_eq!(
            dream.names(),
            vec!["open-app", "open-panel", "select-panel", "show-app"]
        );
    }
}
