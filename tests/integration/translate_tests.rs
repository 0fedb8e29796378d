use rcdb::api::{BevelStyle, RcStore, StoreOptions, StyleItem, Texture};
use rcdb::cache::{MemoryFileSystem, SchemaVariant};
use std::path::Path;

const STYLE_070: &str = "\
menu.frame.appearance: flat gradient vertical
menu.frame.color1: #101010
menu.frame.color2: #202020
toolbar.appearance: raised solid bevel1
toolbar.backgroundColor: #303030
toolbar.color1: #404040
menu.active.textColor: #505050
window.handleHeight: 5
";

fn store_with(name: &str, text: &str, options: StoreOptions) -> RcStore {
    let fs = MemoryFileSystem::new();
    fs.insert(name, text);
    RcStore::with_file_system(Box::new(fs), options)
}

#[test]
fn test_schema_detection() {
    let mut store = store_with("style", STYLE_070, StoreOptions::default());
    assert_eq!(store.schema(Path::new("style")).unwrap(), SchemaVariant::Style);
    assert!(store.is_style_070(Path::new("style")).unwrap());
    assert!(store.looks_like_style_file(Path::new("style")).unwrap());

    let mut store = store_with(
        "old",
        "menu.frame: raised gradient\nmenu.frame.color: #000\n",
        StoreOptions::default(),
    );
    assert_eq!(store.schema(Path::new("old")).unwrap(), SchemaVariant::LegacyStyle);
    assert!(!store.is_style_070(Path::new("old")).unwrap());

    let mut store = store_with("rc", "session.menuFile: menu\n", StoreOptions::default());
    assert_eq!(store.schema(Path::new("rc")).unwrap(), SchemaVariant::Settings);
    assert!(!store.looks_like_style_file(Path::new("rc")).unwrap());
}

#[test]
fn test_legacy_item_and_property_keys() {
    let mut store = store_with("style", STYLE_070, StoreOptions::default());
    let style = Path::new("style");

    assert_eq!(
        store.read(style, "menu.frame").unwrap(),
        Some("flat gradient vertical")
    );
    assert_eq!(store.read(style, "menu.frame.colorTo").unwrap(), Some("#202020"));
    assert_eq!(store.read(style, "handleWidth").unwrap(), Some("5"));
    assert_eq!(store.read(style, "menu.hilite.textColor").unwrap(), Some("#505050"));
}

#[test]
fn test_ambiguous_color_follows_texture() {
    let mut store = store_with("style", STYLE_070, StoreOptions::default());
    let style = Path::new("style");

    // Gradient item: color means color1
    assert_eq!(store.read(style, "menu.frame.color").unwrap(), Some("#101010"));
    // Solid item: color means backgroundColor
    assert_eq!(store.read(style, "toolbar.color").unwrap(), Some("#303030"));
}

#[test]
fn test_translation_can_be_disabled() {
    let options = StoreOptions {
        translate_legacy_keys: false,
        ..StoreOptions::default()
    };
    let mut store = store_with("style", STYLE_070, options);
    assert_eq!(store.read(Path::new("style"), "menu.frame.colorTo").unwrap(), None);
}

#[test]
fn test_settings_files_are_not_translated() {
    let mut store = store_with(
        "rc",
        "menu.frame.color2: #202020\n",
        StoreOptions::default(),
    );
    assert_eq!(store.read(Path::new("rc"), "menu.frame.colorTo").unwrap(), None);
}

#[test]
fn test_style_item_from_store() {
    let mut store = store_with("style", STYLE_070, StoreOptions::default());
    let description = store.read(Path::new("style"), "toolbar").unwrap().unwrap();
    let item = StyleItem::parse(description);
    assert_eq!(item.texture, Texture::Solid);
    assert_eq!(item.bevel_style, BevelStyle::Raised);
}
