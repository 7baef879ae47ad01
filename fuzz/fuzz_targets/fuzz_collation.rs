#![no_main]

use std::cmp::Ordering;

use kartan_text::compare;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (String, String, String)| {
    let (a, b, c) = input;
    // Cap length to keep fuzzing fast.
    if a.len() + b.len() + c.len() > 1024 {
        return;
    }

    // Antisymmetric, and equal only for identical input.
    assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
    assert_eq!(compare(&a, &a), Ordering::Equal);
    if compare(&a, &b) == Ordering::Equal {
        assert_eq!(a, b);
    }

    // Transitive.
    if compare(&a, &b) != Ordering::Greater && compare(&b, &c) != Ordering::Greater {
        assert_ne!(compare(&a, &c), Ordering::Greater);
    }
});
