//! Property-based invariant tests for the containment index.
//!
//! 1. Every region list is sorted by collation key, then code
//! 2. A municipality appears in at most one list, and at most once in it
//! 3. Assigned and orphaned municipalities partition the input
//! 4. An assigned municipality's interior point lies in its region
//! 5. Lookups for arbitrary codes never panic

use std::collections::HashSet;

use kartan_geo::{
    ContainmentIndex, Feature, FeatureCollection, FeatureKind, Geometry, Point, Polygon, Ring,
};
use proptest::prelude::*;

fn rect(x0: f64, y0: f64, w: f64, h: f64) -> Geometry {
    Geometry::Polygon(Polygon::new(
        Ring::new(vec![
            Point::new(x0, y0),
            Point::new(x0 + w, y0),
            Point::new(x0 + w, y0 + h),
            Point::new(x0, y0 + h),
        ]),
        vec![],
    ))
}

/// Regions are vertical strips of width 10 starting at x = 0; some strips
/// overlap their neighbour to exercise first-region-wins.
fn regions_strategy() -> impl Strategy<Value = FeatureCollection> {
    proptest::collection::vec(0.0f64..3.0, 1..6).prop_map(|overlaps| {
        let features = overlaps.iter().enumerate().map(|(i, overlap)| {
            Feature::new(
                FeatureKind::Region,
                format!("{:02}", i + 1),
                format!("Region {i}"),
                rect(i as f64 * 10.0, 0.0, 10.0 + overlap, 10.0),
            )
        });
        FeatureCollection::from_features(FeatureKind::Region, features)
    })
}

fn municipals_strategy() -> impl Strategy<Value = FeatureCollection> {
    let name = proptest::string::string_regex("[A-ZÅÄÖa-zåäö ]{1,8}").expect("name strategy");
    proptest::collection::vec((name, -5.0f64..70.0, -5.0f64..15.0, 0.1f64..4.0), 0..40).prop_map(
        |items| {
            let features = items.into_iter().enumerate().map(|(i, (name, x, y, size))| {
                Feature::new(
                    FeatureKind::Municipality,
                    format!("{i:04}"),
                    name,
                    rect(x, y, size, size),
                )
            });
            FeatureCollection::from_features(FeatureKind::Municipality, features)
        },
    )
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Sorted lists
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn lists_are_sorted(regions in regions_strategy(), municipals in municipals_strategy()) {
        let index = ContainmentIndex::build(&regions, &municipals);
        for region in regions.iter() {
            let keys: Vec<_> = index
                .municipals_in(&region.code)
                .iter()
                .map(|f| (kartan_text::sort_key(&f.name), f.code.clone()))
                .collect();
            prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. At most one list, at most once
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn no_duplicates_across_lists(regions in regions_strategy(), municipals in municipals_strategy()) {
        let index = ContainmentIndex::build(&regions, &municipals);
        let mut seen = HashSet::new();
        for region in regions.iter() {
            for m in index.municipals_in(&region.code) {
                prop_assert!(seen.insert(m.code.clone()), "{} listed twice", m.code);
                prop_assert_eq!(index.region_of(&m.code), Some(region.code.as_str()));
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Partition
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn assigned_and_orphans_partition(regions in regions_strategy(), municipals in municipals_strategy()) {
        let index = ContainmentIndex::build(&regions, &municipals);
        let listed: usize = regions.iter().map(|r| index.municipals_in(&r.code).len()).sum();
        prop_assert_eq!(listed + index.orphans().len(), municipals.len());
        for code in index.orphans() {
            prop_assert_eq!(index.region_of(code), None);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Containment holds and first region wins
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn assigned_point_is_inside_first_region(regions in regions_strategy(), municipals in municipals_strategy()) {
        let index = ContainmentIndex::build(&regions, &municipals);
        for m in municipals.iter() {
            let Some(region_code) = index.region_of(&m.code) else { continue };
            let point = m.geometry.representative_point().expect("rectangles have an interior");
            let first = regions.iter().find(|r| r.geometry.contains(point)).expect("some region");
            prop_assert_eq!(first.code.as_str(), region_code);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Lookups
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unknown_codes_are_empty(regions in regions_strategy(), code in "[0-9]{0,4}") {
        let municipals = FeatureCollection::from_features(FeatureKind::Municipality, []);
        let index = ContainmentIndex::build(&regions, &municipals);
        prop_assert!(index.municipals_in(&code).is_empty());
        prop_assert_eq!(index.region_of(&code), None);
    }
}
