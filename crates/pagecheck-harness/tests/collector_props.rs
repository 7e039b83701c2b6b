//! Property tests for the collector's ordering guarantees and the
//! assertion engine's divergence reporting.

use pagecheck_harness::{assert_sequence, first_divergence, LogCollector};
use proptest::prelude::*;

proptest! {
    #[test]
    fn collector_preserves_arrival_order(entries in proptest::collection::vec(".{0,12}", 0..32)) {
        let collector = LogCollector::new();
        for entry in &entries {
            collector.record(entry.clone());
        }
        prop_assert_eq!(collector.snapshot(), entries);
    }

    #[test]
    fn equal_sequences_always_pass(entries in proptest::collection::vec(".{0,12}", 0..16)) {
        prop_assert!(assert_sequence(&entries, &entries).is_ok());
    }

    #[test]
    fn mutating_one_element_reports_its_index(
        entries in proptest::collection::vec("[a-z]{1,8}", 1..16),
        position in 0usize..16,
    ) {
        let position = position % entries.len();
        let mut actual = entries.clone();
        actual[position] = format!("{}!", actual[position]);

        prop_assert_eq!(first_divergence(&entries, &actual), Some(position));
    }

    #[test]
    fn trailing_extra_entry_diverges_at_expected_length(
        entries in proptest::collection::vec("[a-z]{1,8}", 0..16),
    ) {
        let mut actual = entries.clone();
        actual.push("extra".to_string());

        prop_assert_eq!(first_divergence(&entries, &actual), Some(entries.len()));
    }
}

/// Concurrent recorders interleave arbitrarily, but each thread's own
/// entries must appear in its submission order and none may be lost.
#[test]
fn concurrent_recorders_keep_per_thread_order() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 100;

    let collector = LogCollector::new();
    let handles: Vec<_> = (0..THREADS)
        .map(|thread| {
            let writer = collector.clone();
            std::thread::spawn(move || {
                for i in 0..PER_THREAD {
                    writer.record(format!("t{thread}-{i}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = collector.snapshot();
    assert_eq!(snapshot.len(), THREADS * PER_THREAD);

    for thread in 0..THREADS {
        let prefix = format!("t{thread}-");
        let seen: Vec<usize> = snapshot
            .iter()
            .filter_map(|entry| entry.strip_prefix(&prefix))
            .map(|i| i.parse().unwrap())
            .collect();
        let expected: Vec<usize> = (0..PER_THREAD).collect();
        assert_eq!(seen, expected, "thread {thread} entries out of order");
    }
}
