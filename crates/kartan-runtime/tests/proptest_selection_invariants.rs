//! Property-based invariant tests for the selection state machine.
//!
//! Random feeds over fixed geometry, driven by random transition sequences.
//! After every transition:
//!
//! 1. municipality and entry are set only with a region that has content
//! 2. the selection equals `derive_selection(region, index)`
//! 3. a resolved entry belongs to the selected region's list
//! 4. a resolved municipality is the entry's feature
//! 5. clicking a freshly selected region again clears everything
//! 6. a successful jump to an entry selects exactly that entry

use kartan_content::{ContentEntry, ContentFeed};
use kartan_geo::{Feature, FeatureCollection, FeatureKind, Geometry, Point, Polygon, Ring};
use kartan_runtime::{
    Catalog, JumpOutcome, MainText, RegionOutcome, Selection, SelectionMachine, derive_selection,
};
use proptest::prelude::*;

const REGIONS: [&str; 4] = ["01", "02", "03", "99"];
const MUNICIPALS: [&str; 7] = ["0114", "0180", "1280", "1281", "0380", "0381", "9999"];
const ENTRY_IDS: usize = 24;

fn square(kind: FeatureKind, code: &str, x: f64, y: f64, size: f64) -> Feature {
    let ring = Ring::new(vec![
        Point::new(x, y),
        Point::new(x + size, y),
        Point::new(x + size, y + size),
        Point::new(x, y + size),
    ]);
    Feature::new(kind, code, code, Geometry::Polygon(Polygon::new(ring, vec![])))
}

fn catalog_from(items: Vec<(usize, usize, String, bool)>) -> Catalog {
    let regions = FeatureCollection::from_features(
        FeatureKind::Region,
        [
            square(FeatureKind::Region, "01", 0.0, 0.0, 10.0),
            square(FeatureKind::Region, "02", 20.0, 0.0, 10.0),
            square(FeatureKind::Region, "03", 40.0, 0.0, 10.0),
        ],
    );
    let municipals = FeatureCollection::from_features(
        FeatureKind::Municipality,
        [
            square(FeatureKind::Municipality, "0114", 1.0, 1.0, 2.0),
            square(FeatureKind::Municipality, "0180", 5.0, 1.0, 2.0),
            square(FeatureKind::Municipality, "1280", 21.0, 1.0, 2.0),
            square(FeatureKind::Municipality, "1281", 25.0, 1.0, 2.0),
            square(FeatureKind::Municipality, "0380", 41.0, 1.0, 2.0),
            square(FeatureKind::Municipality, "0381", 45.0, 1.0, 2.0),
        ],
    );
    let feed = ContentFeed::from_entries(items.into_iter().enumerate().map(
        |(i, (region, feature, title, municipal))| {
            if municipal {
                ContentEntry::municipal(i.to_string(), MUNICIPALS[feature], REGIONS[region], title)
            } else {
                ContentEntry::region(i.to_string(), REGIONS[region], title)
            }
        },
    ));
    Catalog::build(regions, municipals, feed, MainText::default()).expect("non-empty geometry")
}

fn catalog_strategy() -> impl Strategy<Value = Catalog> {
    proptest::collection::vec(
        (
            0..REGIONS.len(),
            0..MUNICIPALS.len(),
            proptest::string::string_regex("[ABÖ]{1,2}").expect("title strategy"),
            prop::bool::weighted(0.85),
        ),
        0..ENTRY_IDS,
    )
    .prop_map(catalog_from)
}

#[derive(Debug, Clone)]
enum Op {
    Region(usize),
    JumpRegion(usize),
    Municipal(usize),
    Index(usize),
    Jump(usize),
    Back,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..REGIONS.len()).prop_map(Op::Region),
        (0..REGIONS.len()).prop_map(Op::JumpRegion),
        (0..MUNICIPALS.len()).prop_map(Op::Municipal),
        (0..8usize).prop_map(Op::Index),
        (0..ENTRY_IDS + 2).prop_map(Op::Jump),
        Just(Op::Back),
    ]
}

/// Apply one op; a jump to an entry reports its outcome.
fn apply(m: &mut SelectionMachine, catalog: &Catalog, op: &Op) -> Option<JumpOutcome> {
    match *op {
        Op::Region(i) => {
            m.select_region(catalog, REGIONS[i]);
        }
        Op::JumpRegion(i) => {
            m.jump_to_region(catalog, REGIONS[i]);
        }
        Op::Municipal(i) => {
            m.click_municipal(catalog, MUNICIPALS[i]);
        }
        Op::Index(i) => {
            m.set_index(catalog, i);
        }
        Op::Jump(i) => return Some(m.jump_to_entry(catalog, &i.to_string())),
        Op::Back => m.back_to_regions(catalog),
    }
    None
}

fn check(catalog: &Catalog, s: &Selection) -> Result<(), TestCaseError> {
    // 1
    if s.entry().is_some() || s.municipal().is_some() {
        let code = s.region_code();
        prop_assert!(code.is_some());
        prop_assert!(catalog.content.has_region_content(code.unwrap_or_default()));
    }
    // 2
    let derived = derive_selection(catalog, s.region(), s.index());
    prop_assert_eq!(derived.entry.as_ref(), s.entry());
    prop_assert_eq!(derived.municipal.as_ref(), s.municipal());
    // 3
    if let Some(entry) = s.entry() {
        prop_assert_eq!(entry.region_id.as_deref(), s.region_code());
        let list = catalog
            .content
            .by_region(s.region_code().unwrap_or_default())
            .expect("region has content");
        prop_assert_eq!(list.get(s.index()), Some(entry));
    }
    // 4
    if let Some(municipal) = s.municipal() {
        prop_assert_eq!(Some(&municipal.code), s.entry().map(|e| &e.feature_id));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// 1 – 4, 6. Invariants hold after every transition
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn invariants_hold_after_every_transition(
        catalog in catalog_strategy(),
        ops in proptest::collection::vec(op_strategy(), 0..40),
    ) {
        let mut m = SelectionMachine::new();
        check(&catalog, m.selection())?;
        for op in &ops {
            let jumped = apply(&mut m, &catalog, op);
            check(&catalog, m.selection())?;
            // 6
            if let (Op::Jump(i), Some(JumpOutcome::Entry { index })) = (op, jumped) {
                let s = m.selection();
                prop_assert_eq!(s.index(), index);
                prop_assert_eq!(s.entry().map(|e| e.id.clone()), Some(i.to_string()));
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Region toggle
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn second_click_on_a_region_deselects(
        catalog in catalog_strategy(),
        ops in proptest::collection::vec(op_strategy(), 0..10),
        region in 0..3usize,
    ) {
        let mut m = SelectionMachine::new();
        for op in &ops {
            let _ = apply(&mut m, &catalog, op);
        }
        let code = REGIONS[region];
        if m.selection().region_code() != Some(code) {
            let first = m.select_region(&catalog, code);
            prop_assert!(matches!(first, RegionOutcome::Selected { .. }), "expected RegionOutcome::Selected");
            prop_assert_eq!(m.selection().index(), 0);
        }
        prop_assert_eq!(m.select_region(&catalog, code), RegionOutcome::Deselected);
        prop_assert_eq!(m.selection(), &Selection::default());
    }
}
