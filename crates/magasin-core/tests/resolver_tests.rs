use magasin_core::{resolve_material, resolve_rack, MagasinError, MatchTier, Material};
use magasin_test_utils::{material_at, rack_at};
use proptest::prelude::*;

fn scenario_materials() -> Vec<Material> {
    vec![material_at("MAT001", "PN-100", "SN-200", 1)]
}

#[test]
fn scenario_a_barcode_any_case() {
    let materials = scenario_materials();
    let res = resolve_material("mat001-pn-100-sn-200", &materials).unwrap();
    assert_eq!(res.material.id().as_str(), "MAT001");
    assert_eq!(res.tier, MatchTier::Barcode);
}

#[test]
fn scenario_b_part_serial_concatenation() {
    let materials = scenario_materials();
    let res = resolve_material("PN-100-SN-200", &materials).unwrap();
    assert_eq!(res.material.id().as_str(), "MAT001");
    assert_eq!(res.tier, MatchTier::Combined);
}

#[test]
fn scenario_c_no_punctuation_folding() {
    let materials = scenario_materials();
    let err = resolve_material("SN200", &materials).unwrap_err();
    assert!(matches!(err, MagasinError::NotFound { .. }));
}

#[test]
fn scenario_d_duplicate_serial_latest_wins() {
    let materials = vec![
        material_at("MAT001", "PN-A", "1234567", 100),
        material_at("MAT002", "PN-B", "1234567", 200),
    ];
    let res = resolve_material("1234567", &materials).unwrap();
    assert_eq!(res.material.id().as_str(), "MAT002");
    assert!(res.was_ambiguous());
}

#[test]
fn numeric_tier_requires_four_digits() {
    let materials = vec![material_at("MAT001", "PN-A", "12 3", 1)];
    assert!(resolve_material("123", &materials).is_err());

    let materials = vec![material_at("MAT001", "PN-A", "12 34", 1)];
    assert_eq!(
        resolve_material(" 1234 ", &materials).unwrap().tier,
        MatchTier::NumericSerial
    );
}

#[test]
fn rack_barcode_then_code() {
    let racks = vec![rack_at("RACK001", "A", "01", "01"), rack_at("RACK002", "B", "01", "02")];
    assert_eq!(resolve_rack("b-01-02", &racks).unwrap().id().as_str(), "RACK002");
    assert!(matches!(
        resolve_rack("C-01-01", &racks).unwrap_err(),
        MagasinError::NotFound { .. }
    ));
}

fn arb_materials() -> impl Strategy<Value = Vec<Material>> {
    prop::collection::vec(("[A-Z]{2}-[0-9]{3,5}", "[A-Z0-9]{3,8}", 0i64..10_000), 1..20).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (pn, sn, secs))| {
                    material_at(&format!("MAT{:03}", i + 1), &pn, &sn, secs)
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn prop_barcode_resolves_to_owner(materials in arb_materials(), pick in any::<prop::sample::Index>()) {
        let target = pick.get(&materials);
        let res = resolve_material(target.barcode(), &materials).unwrap();
        prop_assert_eq!(res.material, target);
    }

    #[test]
    fn prop_id_resolves_to_owner(materials in arb_materials(), pick in any::<prop::sample::Index>()) {
        let target = pick.get(&materials);
        let res = resolve_material(&target.id().as_str().to_lowercase(), &materials).unwrap();
        prop_assert_eq!(res.material, target);
    }

    #[test]
    fn prop_empty_input_not_found(materials in arb_materials(), padding in "[ \t]{0,4}") {
        prop_assert!(resolve_material(&padding, &materials).is_err());
        prop_assert!(resolve_material(&padding, &[]).is_err());
    }

    #[test]
    fn prop_resolution_is_idempotent(materials in arb_materials(), scan in "[A-Za-z0-9-]{0,12}") {
        let first = resolve_material(&scan, &materials).ok().map(|r| (r.material.id().clone(), r.tier));
        let second = resolve_material(&scan, &materials).ok().map(|r| (r.material.id().clone(), r.tier));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_duplicate_pair_returns_latest(
        pn in "[A-Z]{2}-[0-9]{3}",
        sn in "[A-Z]{2}[0-9]{3}",
        older in 0i64..1_000,
        gap in 1i64..1_000,
        newer_first in any::<bool>(),
    ) {
        let old = material_at("MAT001", &pn, &sn, older);
        let new = material_at("MAT002", &pn, &sn, older + gap);
        let materials = if newer_first { vec![new, old] } else { vec![old, new] };

        let res = resolve_material(&format!("{pn}-{sn}"), &materials).unwrap();
        prop_assert_eq!(res.material.id().as_str(), "MAT002");
    }
}
