#![no_main]

use kartan_text::sort_key;
use kartan_web::decode_payload;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap length to keep fuzzing fast.
    if data.len() > 64 * 1024 {
        return;
    }

    // Decoding must never panic, whatever the body.
    let Ok(catalog) = decode_payload(200, data) else {
        return;
    };

    for region in catalog.regions.iter() {
        // Containment lists are in collation order and point back at their region.
        let list = catalog.containment.municipals_in(&region.code);
        let keys: Vec<_> = list
            .iter()
            .map(|m| (sort_key(&m.name), m.code.clone()))
            .collect();
        assert!(
            keys.windows(2).all(|w| w[0] <= w[1]),
            "containment list for {} out of order",
            region.code
        );
        for municipal in list {
            assert_eq!(
                catalog.containment.region_of(&municipal.code),
                Some(region.code.as_str())
            );
        }

        // Grouped entries are title-ordered and belong to the region.
        if let Some(entries) = catalog.content.by_region(&region.code) {
            let ordered = entries.ordered();
            assert!(
                ordered
                    .windows(2)
                    .all(|w| sort_key(&w[0].title) <= sort_key(&w[1].title))
            );
            for entry in ordered {
                assert_eq!(entry.region_id.as_deref(), Some(region.code.as_str()));
            }
        }
    }
});
