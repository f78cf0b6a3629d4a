#![no_main]
use libfuzzer_sys::fuzz_target;

use typedef::{Schema, SerdeSchema, ValidateOptions};

fuzz_target!(|schema_and_instance: (SerdeSchema, Vec<u8>)| {
    let (serde_schema, instance) = schema_and_instance;
    let schema: Schema = serde_schema.into();

    // We're only interested in fuzzing against well-formed schemas.
    if schema.validate().is_err() {
        return;
    }

    if let Ok(instance) = serde_json::from_slice(&instance) {
        // Well-formed schemas can still be cyclic, so cap the ref depth.
        let _ = typedef::validate(&schema, &instance, ValidateOptions::new().with_max_depth(32));
    }
});
