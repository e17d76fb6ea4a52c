//! Property-based tests for generated content and handle cursors
//!
//! Run with: cargo test --test proptest_handle

use genfs::{Event, FileGenerator, FileSystem, MountableFs, OpenFile};
use proptest::prelude::*;
use std::io::SeekFrom;
use std::path::Path;
use std::sync::Arc;

/// Generate `/file` from the given write chunks and watch declarations.
fn generate(chunks: Vec<Vec<u8>>, watches: Vec<(String, u32)>) -> (MountableFs, OpenFile) {
    let chunks = Arc::new(chunks);
    let watches = Arc::new(watches);
    let fs = MountableFs::new();
    fs.mount(
        "/file",
        Arc::new(FileGenerator::from_fn(move |_fs, file| {
            let chunks = chunks.clone();
            let watches = watches.clone();
            Box::pin(async move {
                for chunk in chunks.iter() {
                    file.write(chunk);
                }
                for (pattern, bits) in watches.iter() {
                    file.watch(pattern.clone(), Event::from_bits_truncate(*bits));
                }
                Ok(())
            })
        })),
    )
    .unwrap();

    let handle = tokio_test::block_on(fs.open(Path::new("/file"))).unwrap();
    (fs, handle)
}

fn read_all(handle: &mut OpenFile, chunk: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buf = vec![0u8; chunk];
    loop {
        let n = handle.read(&mut buf).unwrap();
        if n == 0 {
            return out;
        }
        out.extend_from_slice(&buf[..n]);
    }
}

fn chunks_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 0..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Reading everything back yields the concatenation of all writes
    #[test]
    fn writes_concatenate(chunks in chunks_strategy(), read_size in 1usize..17) {
        let expected: Vec<u8> = chunks.concat();
        let (_fs, mut handle) = generate(chunks, Vec::new());

        prop_assert_eq!(handle.stat().size, expected.len() as u64);
        prop_assert_eq!(read_all(&mut handle, read_size), expected);
        prop_assert!(handle.is_eof());
    }

    /// A failed seek leaves the cursor exactly where it was
    #[test]
    fn failed_seek_keeps_cursor(
        chunks in chunks_strategy(),
        start in 0u64..300,
        delta in -300i64..300,
    ) {
        let (_fs, mut handle) = generate(chunks, Vec::new());
        let len = handle.stat().size;
        let start = start.min(len);
        handle.seek(SeekFrom::Start(start)).unwrap();

        let target = start as i64 + delta;
        match handle.seek(SeekFrom::Current(delta)) {
            Ok(pos) => {
                prop_assert!(target >= 0 && target as u64 <= len);
                prop_assert_eq!(pos, target as u64);
            }
            Err(err) => {
                prop_assert!(err.is_invalid());
                prop_assert!(target < 0 || target as u64 > len);
                prop_assert_eq!(handle.position(), start);
            }
        }
    }

    /// Seeking to the start always reads from the beginning
    #[test]
    fn seek_start_rewinds(chunks in chunks_strategy(), skip in 0usize..64) {
        let expected: Vec<u8> = chunks.concat();
        let (_fs, mut handle) = generate(chunks, Vec::new());

        let mut scratch = vec![0u8; skip];
        handle.read(&mut scratch).unwrap();
        prop_assert_eq!(handle.seek(SeekFrom::Start(0)).unwrap(), 0);
        prop_assert_eq!(read_all(&mut handle, 7), expected);
    }

    /// Each pattern is linked once, with the union of its masks
    #[test]
    fn watches_merge_per_pattern(
        watches in prop::collection::vec(("[a-c]", 1u32..32), 0..12),
    ) {
        let (fs, _handle) = generate(Vec::new(), watches.clone());

        let links = fs.links();
        let mut patterns: Vec<&str> = watches.iter().map(|(p, _)| p.as_str()).collect();
        patterns.sort_unstable();
        patterns.dedup();
        prop_assert_eq!(links.len(), patterns.len());

        for link in &links {
            let expected = watches
                .iter()
                .filter(|(p, _)| *p == link.pattern)
                .fold(Event::empty(), |acc, (_, bits)| acc | Event::from_bits_truncate(*bits));
            prop_assert_eq!(link.event, expected);
            prop_assert_eq!(link.from.as_path(), Path::new("/file"));
        }
    }
}
