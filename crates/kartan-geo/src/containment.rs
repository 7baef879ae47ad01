#![forbid(unsafe_code)]

//! Region to municipality containment.
//!
//! Each municipality is assigned to the first region (in collection order)
//! whose polygons contain one interior point of the municipality. Boundary
//! points count as inside, so a municipality whose representative point sits
//! exactly on a shared border goes to the earlier region and nowhere else.
//!
//! The index is built once per data load and never mutated.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};
use web_time::Instant;

use crate::feature::{Feature, FeatureCollection};
use crate::geometry::Bounds;

/// Region code to the municipalities inside it, in Swedish alphabetical order.
#[derive(Debug, Clone, Default)]
pub struct ContainmentIndex {
    by_region: HashMap<String, Vec<Arc<Feature>>>,
    region_of: HashMap<String, String>,
    orphans: Vec<String>,
}

impl ContainmentIndex {
    /// Assign every municipality to at most one region.
    pub fn build(regions: &FeatureCollection, municipals: &FeatureCollection) -> Self {
        let start = Instant::now();
        let region_bounds: Vec<(Bounds, &Arc<Feature>)> = regions
            .iter()
            .map(|r| (r.geometry.bounds(), r))
            .collect();

        let mut by_region: HashMap<String, Vec<Arc<Feature>>> = regions
            .iter()
            .map(|r| (r.code.clone(), Vec::new()))
            .collect();
        let mut region_of = HashMap::new();
        let mut orphans = Vec::new();

        for municipal in municipals.iter() {
            let Some(point) = municipal.geometry.representative_point() else {
                warn!(target: "kartan.geo", code = %municipal.code, "municipality without interior point");
                orphans.push(municipal.code.clone());
                continue;
            };
            let owner = region_bounds
                .iter()
                .find(|(bounds, region)| bounds.contains(point) && region.geometry.contains(point))
                .map(|(_, region)| *region);
            match owner {
                Some(region) => {
                    region_of.insert(municipal.code.clone(), region.code.clone());
                    if let Some(list) = by_region.get_mut(&region.code) {
                        list.push(Arc::clone(municipal));
                    }
                }
                None => orphans.push(municipal.code.clone()),
            }
        }

        for list in by_region.values_mut() {
            list.sort_by_cached_key(|f| (kartan_text::sort_key(&f.name), f.code.clone()));
        }

        debug!(
            target: "kartan.geo",
            regions = regions.len(),
            municipals = municipals.len(),
            assigned = region_of.len(),
            orphans = orphans.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "containment index built"
        );

        Self {
            by_region,
            region_of,
            orphans,
        }
    }

    /// Municipalities inside `region_code`. Unknown codes yield an empty slice.
    pub fn municipals_in(&self, region_code: &str) -> &[Arc<Feature>] {
        self.by_region
            .get(region_code)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The region a municipality was assigned to.
    pub fn region_of(&self, municipal_code: &str) -> Option<&str> {
        self.region_of.get(municipal_code).map(String::as_str)
    }

    /// Codes of municipalities that fell inside no region.
    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }

    /// Number of regions indexed (including those with no municipalities).
    pub fn region_count(&self) -> usize {
        self.by_region.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureKind;
    use crate::geometry::{Geometry, Point, Polygon, Ring};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::Polygon(Polygon::new(
            Ring::new(vec![
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
            ]),
            vec![],
        ))
    }

    fn regions() -> FeatureCollection {
        FeatureCollection::from_features(
            FeatureKind::Region,
            [
                Feature::new(FeatureKind::Region, "01", "Stockholms", rect(0.0, 0.0, 10.0, 10.0)),
                Feature::new(FeatureKind::Region, "03", "Uppsala", rect(10.0, 0.0, 20.0, 10.0)),
                Feature::new(FeatureKind::Region, "02", "Tomt", rect(30.0, 0.0, 40.0, 10.0)),
            ],
        )
    }

    fn municipal(code: &str, name: &str, geometry: Geometry) -> Feature {
        Feature::new(FeatureKind::Municipality, code, name, geometry)
    }

    #[test]
    fn assigns_and_sorts() {
        let municipals = FeatureCollection::from_features(
            FeatureKind::Municipality,
            [
                municipal("0181", "Södertälje", rect(1.0, 1.0, 2.0, 2.0)),
                municipal("0114", "Upplands Väsby", rect(3.0, 3.0, 4.0, 4.0)),
                municipal("0180", "Stockholm", rect(5.0, 5.0, 6.0, 6.0)),
                municipal("0380", "Uppsala", rect(11.0, 1.0, 12.0, 2.0)),
            ],
        );
        let index = ContainmentIndex::build(&regions(), &municipals);
        let names: Vec<_> = index.municipals_in("01").iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Stockholm", "Södertälje", "Upplands Väsby"]);
        assert_eq!(index.municipals_in("03").len(), 1);
        assert!(index.municipals_in("02").is_empty());
        assert_eq!(index.region_of("0380"), Some("03"));
        assert_eq!(index.region_count(), 3);
    }

    #[test]
    fn orphans_are_in_no_list() {
        let municipals = FeatureCollection::from_features(
            FeatureKind::Municipality,
            [municipal("9999", "Havet", rect(50.0, 50.0, 51.0, 51.0))],
        );
        let index = ContainmentIndex::build(&regions(), &municipals);
        assert_eq!(index.orphans(), ["9999"]);
        assert_eq!(index.region_of("9999"), None);
        assert!(index.municipals_in("01").is_empty());
        assert!(index.municipals_in("nope").is_empty());
    }

    #[test]
    fn shared_border_goes_to_first_region() {
        // Straddles x = 10; its centroid lies on the shared edge.
        let municipals = FeatureCollection::from_features(
            FeatureKind::Municipality,
            [municipal("0199", "Gräns", rect(9.0, 4.0, 11.0, 6.0))],
        );
        let index = ContainmentIndex::build(&regions(), &municipals);
        assert_eq!(index.municipals_in("01").len(), 1);
        assert!(index.municipals_in("03").is_empty());
    }

    #[test]
    fn equal_names_tie_break_on_code() {
        let municipals = FeatureCollection::from_features(
            FeatureKind::Municipality,
            [
                municipal("0102", "Samma", rect(1.0, 1.0, 2.0, 2.0)),
                municipal("0101", "Samma", rect(3.0, 3.0, 4.0, 4.0)),
            ],
        );
        let index = ContainmentIndex::build(&regions(), &municipals);
        let codes: Vec<_> = index.municipals_in("01").iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, ["0101", "0102"]);
    }
}
