// core/tests/lexicon_tables.rs
//
// Integration tests for the lexicon store and key normalizer.
//
// Tests cover:
// - Strict keys collide across diacritics, case, spacing and punctuation
// - Loading tables from a TOML file, and the load-time validation errors
// - Concurrent first lookups against one shared lexicon

use std::sync::Arc;
use std::thread;

use vnaddr_core::{normalize_display, normalize_key, Lexicon, LexiconTables, StrictKey};

#[test]
fn spelling_variants_share_a_strict_key() {
    let variants = ["Bình Thạnh", "binh thanh", "BINH-THANH", " Bình  Thạnh. ", "binh_thanh"];
    for v in variants {
        assert_eq!(normalize_key(v), "binhthanh", "{v}");
    }
    assert_eq!(normalize_key("Quận 10"), "quan10");
    assert_eq!(normalize_key("Đường số 9"), "duongso9");
}

#[test]
fn display_form_keeps_punctuation() {
    assert_eq!(normalize_display("P.Bến  Nghé, Q.1"), "p.ben nghe, q.1");
    assert_eq!(normalize_display(&normalize_display("Thủ Đức")), "thu duc");
}

#[test]
fn load_from_file() {
    let path = std::env::temp_dir().join(format!("vnaddr_lexicon_{}.toml", std::process::id()));
    let content = r#"
default_router = "desk"

[district_names]
"Hoàn Kiếm" = "hoan kiem"

[district_aliases]
hk = "hoan kiem"

[ward_to_district]
"Hàng Bạc" = "hoan kiem"

[ship_fee_by_ward]
"Hàng Bạc" = 15

[ship_fee_by_district]
[area_to_router]
"#;
    std::fs::write(&path, content).unwrap();
    let lexicon = Lexicon::load_toml(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(
        lexicon.resolve_district_key(&StrictKey::new("HK")),
        Some("hoan kiem")
    );
    assert_eq!(
        lexicon.resolve_ward_key(&StrictKey::new("hang bac")),
        Some("hoan kiem")
    );
    assert_eq!(
        lexicon.ship_fee_for_ward(&StrictKey::new("Hàng Bạc")),
        Some(15.0)
    );
    assert_eq!(lexicon.router_for(&StrictKey::new("hoan kiem")), None);
    assert_eq!(lexicon.default_router(), "desk");
}

#[test]
fn load_errors_name_the_file() {
    let missing = std::env::temp_dir().join("vnaddr_no_such_lexicon.toml");
    let err = Lexicon::load_toml(&missing).unwrap_err();
    assert!(format!("{:#}", err).contains("vnaddr_no_such_lexicon.toml"));

    let empty = LexiconTables {
        default_router: "desk".into(),
        ..Default::default()
    };
    assert!(empty.validate().is_err());
}

#[test]
fn concurrent_first_lookup() {
    let lexicon = Arc::new(Lexicon::new(Lexicon::builtin().tables().clone()));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let lx = Arc::clone(&lexicon);
            thread::spawn(move || {
                lx.resolve_district_key(&StrictKey::new("go vap"))
                    .map(str::to_string)
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap().as_deref(), Some("go vap"));
    }
}
