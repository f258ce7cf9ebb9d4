// SPDX-License-Identifier: PMPL-1.0-or-later

//! Route table and translation behaviour as seen by page views

use portfolio_client::i18n::{t, Locale, Translator};
use portfolio_client::router::{self, ScrollPosition, View, ROUTES};
use portfolio_client::storage::{FileStore, WritableStore, LOCALE_KEY};
use tempfile::TempDir;

#[test]
fn test_route_table_is_complete() {
    let paths: Vec<&str> = ROUTES.iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "/",
            "/career",
            "/moments",
            "/editor",
            "/articles",
            "/article/:id",
            "/login",
            "/projects",
            "/projects/upload",
            "/projects/:id",
        ]
    );
}

#[test]
fn test_every_view_has_a_title_in_every_locale() {
    for route in ROUTES {
        for locale in Locale::all() {
            assert!(
                !t(*locale, route.view.title_key()).is_empty(),
                "{} has no title in {}",
                route.view.name(),
                locale
            );
        }
    }
}

#[test]
fn test_navigation_to_detail_pages() {
    let nav = router::navigate("/article/17?from=home").unwrap();
    assert_eq!(nav.target.view(), View::ArticleDetail);
    assert_eq!(nav.target.param("id"), Some("17"));
    assert_eq!(nav.scroll, ScrollPosition::Top);

    let nav = router::navigate("/projects/upload").unwrap();
    assert_eq!(nav.target.view(), View::ProjectUpload);
    assert!(nav.target.params.is_empty());
}

#[test]
fn test_locale_from_file_store() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("storage.json"));

    assert_eq!(Translator::from_store(&store).locale(), Locale::Zh);
    assert_eq!(Translator::from_store(&store).t("nav.projects"), "作品");

    store.set(LOCALE_KEY, "en").unwrap();
    let tr = Translator::from_store(&store);
    assert_eq!(tr.locale(), Locale::En);
    assert_eq!(tr.t("nav.articles"), "Life");
}
