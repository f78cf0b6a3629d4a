#![no_main]
use libfuzzer_sys::fuzz_target;

use typedef::{Schema, SerdeSchema};

fuzz_target!(|serde_schema: SerdeSchema| {
    let schema: Schema = serde_schema.into();
    let _ = schema.validate();
});
