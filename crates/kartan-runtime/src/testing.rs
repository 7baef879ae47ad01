#![forbid(unsafe_code)]

//! Shared fixtures for unit tests.

use kartan_content::{ContentEntry, ContentFeed};
use kartan_geo::{Feature, FeatureCollection, FeatureKind, Geometry, Point, Polygon, Ring};

use crate::catalog::{Catalog, MainText};

/// Axis-aligned square feature with its lower-left corner at `(x, y)`.
pub(crate) fn rect_feature(
    kind: FeatureKind,
    code: &str,
    name: &str,
    x: f64,
    y: f64,
    size: f64,
) -> Feature {
    let ring = Ring::new(vec![
        Point::new(x, y),
        Point::new(x + size, y),
        Point::new(x + size, y + size),
        Point::new(x, y + size),
        Point::new(x, y),
    ]);
    Feature::new(kind, code, name, Geometry::Polygon(Polygon::new(ring, vec![])))
}

/// Three regions side by side.
///
/// * `01` Stockholms: municipal entries Alpha (0114), Beta (0180), Gamma
///   (0181); 0115 has no entries.
/// * `02` Skåne: no entries.
/// * `03` Uppsala: a region entry plus a municipal entry Delta (0380).
pub(crate) fn fixture_catalog() -> Catalog {
    let region = |code, name, x| rect_feature(FeatureKind::Region, code, name, x, 0.0, 10.0);
    let municipal =
        |code, name, x, y| rect_feature(FeatureKind::Municipality, code, name, x, y, 2.0);

    let regions = FeatureCollection::from_features(
        FeatureKind::Region,
        [
            region("01", "Stockholms", 0.0),
            region("02", "Skåne", 20.0),
            region("03", "Uppsala", 40.0),
        ],
    );
    let municipals = FeatureCollection::from_features(
        FeatureKind::Municipality,
        [
            municipal("0114", "Upplands Väsby", 1.0, 1.0),
            municipal("0115", "Vallentuna", 1.0, 5.0),
            municipal("0180", "Stockholm", 4.0, 1.0),
            municipal("0181", "Södertälje", 7.0, 1.0),
            municipal("1280", "Malmö", 21.0, 1.0),
            municipal("0380", "Uppsala", 41.0, 1.0),
        ],
    );
    let feed = ContentFeed::from_entries([
        ContentEntry::municipal("m-gamma", "0181", "01", "Gamma"),
        ContentEntry::municipal("m-alpha", "0114", "01", "Alpha"),
        ContentEntry::municipal("m-beta", "0180", "01", "Beta"),
        ContentEntry::region("r-uppsala", "03", "Uppsala län"),
        ContentEntry::municipal("m-delta", "0380", "03", "Delta"),
    ]);
    Catalog::build(
        regions,
        municipals,
        feed,
        MainText::new("Kartan", "Välj ett län"),
    )
    .expect("fixture catalog")
}
