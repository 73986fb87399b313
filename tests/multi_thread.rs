#[cfg(test)]
mod tests {
    use exifkit::{ExifMetadata, IfdName, TagRegistry, TagValue, ValueFormatter};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_registry_reads() {
        let registry = Arc::new(TagRegistry::builtin().unwrap());

        let mut handles = vec![];

        // Spawn 10 threads that all resolve tags concurrently
        for _ in 0..10 {
            let registry_clone = registry.clone();
            let handle = thread::spawn(move || {
                assert_eq!(registry_clone.resolve_id("Make").unwrap(), 271);
                assert_eq!(registry_clone.resolve_name(33434u16, None).unwrap(), "ExposureTime");
                assert_eq!(registry_clone.ifd_of("GPSLatitude", false).unwrap(), IfdName::Gps);
            });
            handles.push(handle);
        }

        // Wait for all threads to complete
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_one_store_per_thread() {
        let registry = Arc::new(TagRegistry::builtin().unwrap());
        let formatter = Arc::new(ValueFormatter::builtin().unwrap());

        let mut handles = vec![];

        // Each thread owns the metadata of one file
        for i in 0..8_i64 {
            let registry = registry.clone();
            let formatter = formatter.clone();
            let handle = thread::spawn(move || {
                let mut meta = ExifMetadata::new(registry, formatter);
                meta.write_tag("Artist", format!("Photographer {}", i), None)
                    .unwrap();
                meta.write_tag("ExposureTime", (1_i64, 100 * (i + 1)), None)
                    .unwrap();
                (
                    meta.read_tag("Artist", None).unwrap().clone(),
                    meta.read_tag_formatted("ExposureTime", None, None).unwrap(),
                )
            });
            handles.push(handle);
        }

        for (i, handle) in handles.into_iter().enumerate() {
            let (artist, exposure) = handle.join().unwrap();
            assert_eq!(artist, TagValue::Ascii(format!("Photographer {}", i)));
            assert_eq!(exposure, format!("1/{}s", 100 * (i + 1)));
        }
    }
}
