#![no_main]

use fmsynth_patch::{canonical_patch_hash, Patch};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Loading either fails cleanly or yields a valid patch.
    let Ok(patch) = Patch::from_json(text) else {
        return;
    };
    assert!(patch.validate().is_ok());

    // A valid patch saves and reloads to an equal patch with the same hash.
    let json = patch.to_json_pretty().expect("valid patch serializes");
    let reloaded = Patch::from_json(&json).expect("saved patch reloads");
    assert_eq!(patch, reloaded);
    assert_eq!(
        canonical_patch_hash(&patch).expect("hash"),
        canonical_patch_hash(&reloaded).expect("hash")
    );
});
