use std::sync::Arc;

use vnaddr::{parse, AddressParser, Config, Lexicon, ParsedAddress};

fn fields(p: &ParsedAddress) -> (&str, &str, &str, &str) {
    (
        p.house_id.as_str(),
        p.street_name.as_str(),
        p.ward.as_str(),
        p.district.as_str(),
    )
}

#[test]
fn street_then_district_name() {
    let p = parse("208 Nguyễn Hữu Cảnh Bình Thạnh");
    assert_eq!(fields(&p), ("208", "nguyen huu canh", "", "binh thanh"));
    assert_eq!(p.confidence, 0.7);
}

#[test]
fn standalone_numbered_district() {
    let p = parse("Q.1");
    assert_eq!(fields(&p), ("", "", "", "1"));
    assert_eq!(p.confidence, 0.3);
}

#[test]
fn ward_number_and_district_alias() {
    let p = parse("F22, Q.bthanh");
    assert_eq!(p.ward, "phuong 22");
    assert_eq!(p.district, "binh thanh");
    assert_eq!(p.confidence, 0.6);
}

#[test]
fn empty_input() {
    let p = parse("");
    assert_eq!(p, ParsedAddress::default());
    assert_eq!(p.confidence, 0.0);
}

#[test]
fn landmark_only() {
    let p = parse("cổng 3");
    assert_eq!(fields(&p), ("cong 3", "", "", ""));
    assert_eq!(p.confidence, 0.2);
}

#[test]
fn full_address_with_every_field() {
    let p = parse("45/2 Trần Hưng Đạo Phường 5 Quận 5");
    assert_eq!(fields(&p), ("45/2", "tran hung dao", "phuong 5", "5"));
    assert_eq!(p.confidence, 1.0);

    let p = parse("12 Lê Lợi P.Bến Nghé Q1 TP.HCM");
    assert_eq!(fields(&p), ("12", "le loi", "p.ben nghe", "1"));
}

#[test]
fn district_at_the_tail_in_any_spelling() {
    for input in [
        "12 Lê Lợi Gò Vấp",
        "12 Lê Lợi go vap",
        "12 Lê Lợi Quận Gò Vấp",
        "12 Lê Lợi Q.Gò Vấp",
    ] {
        let p = parse(input);
        assert_eq!(fields(&p), ("12", "le loi", "", "go vap"), "{input}");
    }
}

#[test]
fn district_glued_after_street_text() {
    let p = parse("208 Nguyễn Hữu Cảnh Gò Vấp TPHCM");
    assert_eq!(p.district, "go vap");
    assert_eq!(p.house_id, "208");
    assert_eq!(p.street_name, "nguyen huu canh");
}

#[test]
fn ward_fills_missing_district() {
    let p = parse("Phường Thảo Điền");
    assert_eq!(p.ward, "phuong thao dien");
    assert_eq!(p.district, "thu duc");
    assert_eq!(p.confidence, 0.6);

    // without the ward word the name is read as a district pointer
    let p = parse("Thảo Điền");
    assert_eq!(p.district, "thu duc");
    assert_eq!(p.ward, "");
}

#[test]
fn locality_segments_follow_config() {
    let input = "12 Lê Lợi, Quận 1, TP.HCM";
    assert_eq!(parse(input).street_name, "le loi");

    let config = Config {
        drop_locality_segments: false,
        ..Config::default()
    };
    let parser = AddressParser::new(Lexicon::builtin(), config);
    let p = parser.parse(input);
    assert_eq!(p.district, "1");
    assert_eq!(p.street_name, "le loi, tp.hcm");
}

#[test]
fn custom_lexicon() {
    let toml = r#"
default_router = "desk"

[district_names]
"Ba Đình" = "ba dinh"
"Hoàn Kiếm" = "hoan kiem"

[district_aliases]
bdinh = "ba dinh"

[ward_to_district]
"Kim Mã" = "ba dinh"

[ship_fee_by_ward]
[ship_fee_by_district]
[area_to_router]
"#;
    let lexicon = Arc::new(Lexicon::from_toml_str(toml).unwrap());
    let parser = AddressParser::new(lexicon, Config::default());
    let p = parser.parse("5 Nguyễn Thái Học Ba Đình");
    assert_eq!(fields(&p), ("5", "nguyen thai hoc", "", "ba dinh"));
    assert_eq!(parser.parse("Q.bdinh").district, "ba dinh");
}

#[test]
fn parse_is_pure() {
    let parser = AddressParser::builtin();
    let input = "45/2 Trần Hưng Đạo Phường 5 Quận 5";
    assert_eq!(parser.parse(input), parser.parse(input));
    let batch = parser.parse_batch(&[input, "Q.1", ""]);
    assert_eq!(batch.len(), 3);
    assert_eq!(batch[0], parser.parse(input));
    assert_eq!(batch[1].district, "1");
    assert!(batch[2].is_empty());
}

#[test]
fn confidence_stays_in_range() {
    let long = "Lê Lợi ".repeat(300);
    for input in [
        "P123Q456",
        ";;;,,,",
        "Q",
        "quận",
        "Phường",
        "12/3/4-5",
        "P1Q3",
        "Tầng 5, Tòa nhà Bitexco, 2 Hải Triều, Bến Nghé, Quận 1, TP. Hồ Chí Minh",
        long.as_str(),
    ] {
        let p = parse(input);
        assert!((0.0..=1.0).contains(&p.confidence), "{input}: {}", p.confidence);
    }
}

#[test]
fn display_joins_fields() {
    let p = parse("45/2 Trần Hưng Đạo Phường 5 Quận 5");
    assert_eq!(p.to_string(), "45/2, tran hung dao, phuong 5, 5");
    assert_eq!(vnaddr::format(&p), p.to_string());
}

#[test]
fn slashed_house_number_stays_with_the_street() {
    let p = parse("1/2 Lê Lợi, Phường Bến Nghé");
    assert_eq!(fields(&p), ("1/2", "le loi", "phuong ben nghe", "1"));
    assert_eq!(p.confidence, 1.0);
}

#[test]
fn highway_name_is_a_street() {
    let p = parse("Số 5, Xa lộ Hà Nội, Thủ Đức");
    assert_eq!(fields(&p), ("so 5", "xa lo ha noi", "", "thu duc"));
}

#[test]
fn fullwidth_digits_never_form_a_district() {
    let p = parse("12 Lê Lợi, Q１");
    assert_eq!(p.district, "");
    assert_eq!(p.house_id, "12");
}
