#![no_main]

use arbitrary::Arbitrary;
use kartan_geo::Viewport;
use kartan_runtime::{KartanConfig, LoadState, Msg, Overlay, SearchKind, derive_selection};
use kartan_web::WebSession;
use libfuzzer_sys::fuzz_target;

const REGIONS: [&str; 4] = ["01", "02", "03", "99"];
const MUNICIPALS: [&str; 5] = ["0114", "0180", "1280", "0380", "9999"];
const ENTRIES: [&str; 5] = ["10", "11", "12", "30", "77"];

#[derive(Debug, Arbitrary)]
enum Op {
    Region(u8),
    Municipal(u8),
    Index(u8),
    Prev,
    Next,
    Background,
    Back,
    SearchRegion(u8),
    SearchEntry(u8),
    ToggleSearch(bool),
    Open(u8),
    Close(u8),
    Resize { wide: bool },
    ZoomIn,
    ZoomOut,
    Tick(u16),
}

fn pick<'a>(items: &[&'a str], i: u8) -> &'a str {
    items[usize::from(i) % items.len()]
}

fn overlay(i: u8) -> Overlay {
    match i % 3 {
        0 => Overlay::Detail,
        1 => Overlay::Info,
        _ => Overlay::AllListing,
    }
}

fn square(key: &str, name_key: &str, code: &str, x: u32, size: u32) -> String {
    let (x1, y1) = (x + size, size);
    format!(
        r#"{{"type":"Feature","properties":{{"{key}":"{code}","{name_key}":"{code}"}},
        "geometry":{{"type":"Polygon","coordinates":[[[{x},0],[{x1},0],[{x1},{y1}],[{x},{y1}],[{x},0]]]}}}}"#
    )
}

fn payload() -> Vec<u8> {
    let regions = [("01", 0), ("02", 20), ("03", 40)]
        .map(|(code, x)| square("LnKod", "LnNamn", code, x, 10))
        .join(",");
    let municipals = [("0114", 1), ("0180", 5), ("1280", 21), ("0380", 41)]
        .map(|(code, x)| square("KnKod", "KnNamn", code, x, 2))
        .join(",");
    format!(
        r#"{{
            "regions": {{"type":"FeatureCollection","features":[{regions}]}},
            "municipals": {{"type":"FeatureCollection","features":[{municipals}]}},
            "contents": [
                {{"id":"10","type":"municipal","feature_id":"0114","region_id":"01","title":"Alpha"}},
                {{"id":"11","type":"municipal","feature_id":"0180","region_id":"01","title":"Beta"}},
                {{"id":"12","type":"municipal","feature_id":"0180","region_id":"01","title":"Alpha"}},
                {{"id":"30","type":"region","feature_id":"03","title":"Län"}}
            ]
        }}"#
    )
    .into_bytes()
}

fuzz_target!(|ops: Vec<Op>| {
    if ops.len() > 256 {
        return;
    }

    let mut session = WebSession::new(KartanConfig::default());
    session.init();
    session.push(Msg::Resized(Viewport::new(1024.0, 768.0)));
    session.push_data(200, &payload());
    session.step();

    for op in ops {
        let msg = match op {
            Op::Region(i) => Msg::RegionClicked(pick(&REGIONS, i).into()),
            Op::Municipal(i) => Msg::MunicipalClicked(pick(&MUNICIPALS, i).into()),
            Op::Index(i) => Msg::IndexSelected(usize::from(i % 8)),
            Op::Prev => Msg::PrevSlide,
            Op::Next => Msg::NextSlide,
            Op::Background => Msg::BackgroundClicked,
            Op::Back => Msg::BackToRegions,
            Op::SearchRegion(i) => Msg::SearchRegionPicked(pick(&REGIONS, i).into()),
            Op::SearchEntry(i) => Msg::SearchEntryPicked(pick(&ENTRIES, i).into()),
            Op::ToggleSearch(regions) => Msg::SearchToggled(if regions {
                SearchKind::Regions
            } else {
                SearchKind::Initiatives
            }),
            Op::Open(i) => Msg::OverlayOpened(overlay(i)),
            Op::Close(i) => Msg::OverlayClosed(overlay(i)),
            Op::Resize { wide } => {
                Msg::Resized(Viewport::new(if wide { 1280.0 } else { 400.0 }, 800.0))
            }
            Op::ZoomIn => Msg::ZoomIn,
            Op::ZoomOut => Msg::ZoomOut,
            Op::Tick(ms) => {
                session.advance_time(std::time::Duration::from_millis(u64::from(ms)));
                session.step();
                continue;
            }
        };
        session.send(msg);

        let app = session.app();
        let LoadState::Ready(catalog) = app.load_state() else {
            panic!("catalog lost after load");
        };
        let s = app.selection();

        // Municipality and entry only with a region that has content.
        if s.entry().is_some() || s.municipal().is_some() {
            let code = s.region_code().unwrap_or_default();
            assert!(catalog.content.has_region_content(code));
        }

        // The selection is always the derived one.
        let derived = derive_selection(catalog, s.region(), s.index());
        assert_eq!(derived.entry.as_ref(), s.entry());
        assert_eq!(derived.municipal.as_ref(), s.municipal());

        // Toast queue stays within its bounds.
        let queue = session.toast_queue();
        assert!(queue.visible_count() <= app.config().notify.max_visible);
    }
});
