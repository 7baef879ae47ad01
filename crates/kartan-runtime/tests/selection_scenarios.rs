//! End-to-end selection scenarios over a catalog decoded from feed JSON.

use kartan_content::ContentFeed;
use kartan_geo::{FeatureCollection, FeatureKind};
use kartan_runtime::{
    Catalog, IndexOutcome, JumpOutcome, MainText, MunicipalOutcome, RegionOutcome,
    SelectionMachine, ViewMode,
};

fn square(
    code_key: &str,
    name_key: &str,
    code: &str,
    name: &str,
    x: f64,
    y: f64,
    size: f64,
) -> String {
    let (x1, y1) = (x + size, y + size);
    format!(
        r#"{{"type":"Feature","properties":{{"{code_key}":"{code}","{name_key}":"{name}"}},
            "geometry":{{"type":"Polygon","coordinates":[[[{x},{y}],[{x1},{y}],[{x1},{y1}],[{x},{y1}],[{x},{y}]]]}}}}"#
    )
}

fn collection(features: &[String]) -> String {
    format!(r#"{{"type":"FeatureCollection","features":[{}]}}"#, features.join(","))
}

const CONTENTS: &str = r#"{
  "12": {"type":"municipal","feature_id":"0181","region_id":"01","title":"Gamma"},
  "10": {"type":"municipal","feature_id":"0114","region_id":"01","title":"Alpha"},
  "11": {"type":"municipal","feature_id":"0180","region_id":"01","title":"Beta"},
  "20": {"type":"region","feature_id":"03","title":"Uppsala län"},
  "21": {"type":"municipal","feature_id":"0380","region_id":"03","title":"Delta"},
  "22": {"type":"municipal","feature_id":"0381","region_id":"03","title":"Epsilon"},
  "30": {"type":"page","feature_id":"01","title":"Ignored"}
}"#;

fn catalog() -> Catalog {
    let region = |code, name, x| square("LnKod", "LnNamn", code, name, x, 0.0, 10.0);
    let municipal = |code, name, x| square("KnKod", "KnNamn", code, name, x, 1.0, 2.0);
    let regions = collection(&[
        region("01", "Stockholms", 0.0),
        region("02", "Skåne", 20.0),
        region("03", "Uppsala", 40.0),
    ]);
    let municipals = collection(&[
        municipal("0114", "Upplands Väsby", 1.0),
        municipal("0180", "Stockholm", 4.0),
        municipal("0181", "Södertälje", 7.0),
        municipal("1280", "Malmö", 21.0),
        municipal("0380", "Uppsala", 41.0),
        municipal("0381", "Enköping", 44.0),
        municipal("9999", "Utanför", 100.0),
    ]);
    Catalog::build(
        FeatureCollection::from_geojson_str(FeatureKind::Region, &regions).unwrap(),
        FeatureCollection::from_geojson_str(FeatureKind::Municipality, &municipals).unwrap(),
        ContentFeed::from_json_str(CONTENTS).unwrap(),
        MainText::new("Innanförskapets karta", "Välj en region"),
    )
    .unwrap()
}

#[test]
fn stockholm_alpha_beta_gamma() {
    let catalog = catalog();
    let list = catalog.content.by_region("01").unwrap();
    let titles: Vec<_> = list.ordered().iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Alpha", "Beta", "Gamma"]);
    assert_eq!(list.position_of("0114", "Alpha"), Some(0));

    let mut m = SelectionMachine::new();
    m.select_region(&catalog, "01");
    assert_eq!(m.set_index(&catalog, 2), IndexOutcome::Set { index: 2, resolved: true });
    let s = m.selection();
    assert_eq!(s.entry().unwrap().title, "Gamma");
    assert_eq!(s.municipal().unwrap().code, "0181");
}

#[test]
fn region_without_entries_resolves_to_no_content() {
    let catalog = catalog();
    let mut m = SelectionMachine::new();
    m.select_region(&catalog, "02");
    assert!(matches!(
        ViewMode::resolve(&catalog, m.selection()),
        ViewMode::NoContent { region } if region.code == "02"
    ));
    assert_eq!(m.click_municipal(&catalog, "1280"), MunicipalOutcome::Ignored);
}

#[test]
fn region_level_entry_wins_over_municipal_content() {
    let catalog = catalog();
    assert!(catalog.content.has_region_content("03"));
    let mut m = SelectionMachine::new();
    m.select_region(&catalog, "03");
    m.set_index(&catalog, 1);
    assert!(matches!(
        ViewMode::resolve(&catalog, m.selection()),
        ViewMode::RegionEntry { entry, .. } if entry.title == "Uppsala län"
    ));
}

#[test]
fn switching_regions_resolves_index_zero_against_the_new_list() {
    let catalog = catalog();
    let mut m = SelectionMachine::new();
    m.select_region(&catalog, "01");
    m.set_index(&catalog, 2);
    m.select_region(&catalog, "03");
    let s = m.selection();
    assert_eq!(s.index(), 0);
    assert_eq!(s.entry().unwrap().title, "Delta");
    assert_eq!(s.entry().unwrap().region_id.as_deref(), Some("03"));
}

#[test]
fn clicking_the_selected_region_deselects() {
    let catalog = catalog();
    let mut m = SelectionMachine::new();
    m.select_region(&catalog, "01");
    m.click_municipal(&catalog, "0180");
    assert_eq!(m.select_region(&catalog, "01"), RegionOutcome::Deselected);
    let s = m.selection();
    assert!(s.region().is_none());
    assert!(s.municipal().is_none());
    assert!(s.entry().is_none());
    assert_eq!(s.index(), 0);
}

#[test]
fn jump_to_initiative_sets_region_and_entry_together() {
    let catalog = catalog();
    let mut m = SelectionMachine::new();
    m.select_region(&catalog, "02");
    assert_eq!(m.jump_to_entry(&catalog, "22"), JumpOutcome::Entry { index: 1 });
    let s = m.selection();
    assert_eq!(s.region_code(), Some("03"));
    assert_eq!(s.entry().unwrap().title, "Epsilon");
    assert_eq!(s.municipal().unwrap().code, "0381");

    assert_eq!(m.jump_to_entry(&catalog, "30"), JumpOutcome::NotFound);
    assert_eq!(m.selection().entry().unwrap().title, "Epsilon");
}

#[test]
fn orphan_municipality_is_in_no_list() {
    let catalog = catalog();
    assert_eq!(catalog.containment.region_of("9999"), None);
    assert!(catalog.containment.orphans().iter().any(|c| c == "9999"));
    for region in catalog.regions.iter() {
        assert!(
            catalog
                .containment
                .municipals_in(&region.code)
                .iter()
                .all(|m| m.code != "9999")
        );
    }
    assert!(catalog.containment.municipals_in("77").is_empty());
}
