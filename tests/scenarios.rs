//! End-to-end shaper scenarios
//!
//! Each test drives a `PacketShaper` through whole batches with explicit
//! clock values, so leak behavior does not depend on scheduler timing.

mod integration_harness;

use bytes::Bytes;
use hlba_obfuscation::{KeyRow, apply, select_key_row};
use hlba_shaper::{CoveragePolicy, PacketShaper, SharedShaper, plan};
use integration_harness::{drain_delay, packets_of, shaper_at};
use std::time::{Duration, Instant};

/// Test: three 1-byte packets, no elapsed time, capacity 2
#[test]
fn test_burst_without_drain_drops_third() {
    let t0 = Instant::now();
    let mut shaper = shaper_at(2, 2.0, t0);

    let mut accepted = 0;
    let mut dropped = 0;
    for packet in packets_of(&[1, 1, 1]) {
        let result = shaper.process_at(&[packet], t0);
        accepted += result.accepted.len();
        dropped += result.dropped.len();
    }

    assert_eq!(accepted, 2);
    assert_eq!(dropped, 1);
    assert_eq!(shaper.bucket_len(), 2);
}

/// Test: bucket fully drains before the third packet arrives
#[test]
fn test_drain_before_third_packet() {
    let t0 = Instant::now();
    let mut shaper = shaper_at(2, 2.0, t0);
    let packets = packets_of(&[1, 1, 1]);

    assert_eq!(shaper.process_at(&packets[0..1], t0).accepted.len(), 1);
    assert_eq!(shaper.process_at(&packets[1..2], t0).accepted.len(), 1);

    let later = t0 + drain_delay(2.0, 2);
    let third = shaper.process_at(&packets[2..3], later);

    assert_eq!(third.accepted, vec![packets[2].clone()]);
    assert!(third.dropped.is_empty());
    // Both earlier packets leaked; only the third is held
    assert_eq!(shaper.bucket_len(), 1);
    assert_eq!(shaper.reveal(), vec![packets[2].clone()]);
}

/// Test: small batch is processed smallest first
#[test]
fn test_small_batch_order() {
    let sizes = [30, 10, 70, 5];
    assert_eq!(plan(&sizes), vec![3, 1, 0, 2]);

    let t0 = Instant::now();
    let mut shaper = shaper_at(4, 2.0, t0);
    let batch = packets_of(&sizes);

    let result = shaper.process_at(&batch, t0);
    let lengths: Vec<usize> = result.accepted.iter().map(Bytes::len).collect();
    assert_eq!(lengths, vec![5, 10, 30, 70]);
}

/// Test: six 5-byte packets use the Pascal row, not the fixed key
#[test]
fn test_six_packets_use_pascal_row() {
    let key = select_key_row(6);
    assert_eq!(key.values(), &[1, 4, 6, 4, 1]);

    let t0 = Instant::now();
    let mut shaper = shaper_at(6, 0.0, t0);
    let batch = packets_of(&[5; 6]);

    shaper.process_at(&batch, t0);

    for (entry, original) in shaper.in_flight().zip(&batch) {
        assert_eq!(entry.key(), &key);
        assert_eq!(&entry.payload()[..], apply(original, &key).as_slice());
    }
}

/// Test: five packets use the fixed two-value key
#[test]
fn test_five_packets_use_fixed_key() {
    let t0 = Instant::now();
    let mut shaper = shaper_at(5, 0.0, t0);
    shaper.process_at(&packets_of(&[5; 5]), t0);

    let fixed = KeyRow::try_from(vec![1, 1]).unwrap();
    assert!(shaper.in_flight().all(|entry| entry.key() == &fixed));
}

/// Test: short packets survive a seal/reveal round trip
#[test]
fn test_short_packets_reveal_exactly() {
    let t0 = Instant::now();
    let mut shaper = shaper_at(16, 0.0, t0);
    let batch = packets_of(&[0, 1, 2, 5, 9, 10, 11]);

    let result = shaper.process_at(&batch, t0);

    assert_eq!(result.accepted.len(), batch.len());
    assert_eq!(shaper.reveal(), result.accepted);
}

/// Test: large batch follows the improvement trail and reports the rest
#[test]
fn test_large_batch_partial_coverage() {
    let t0 = Instant::now();
    let sizes = [50, 60, 40, 40, 90, 20, 30, 20, 25, 80, 10, 15];
    let batch = packets_of(&sizes);

    let mut skip = shaper_at(32, 1.0, t0);
    let result = skip.process_at(&batch, t0);
    assert_eq!(result.accepted.len(), 4);
    assert_eq!(result.unvisited.len(), 8);
    assert_eq!(result.accepted.len() + result.unvisited.len(), batch.len());

    let mut append =
        PacketShaper::starting_at(32, 1.0, CoveragePolicy::AppendNatural, t0).unwrap();
    let result = append.process_at(&batch, t0);
    assert_eq!(result.accepted.len(), batch.len());
    assert!(result.unvisited.is_empty());
}

/// Test: bandwidth total grows across batches and per-packet diffs are negative
#[test]
fn test_bandwidth_accumulates() {
    let t0 = Instant::now();
    let mut shaper = shaper_at(64, 2.0, t0);

    let mut expected = 0.0;
    for size in [5, 10, 30, 70, 100] {
        let result = shaper.process_at(&packets_of(&[size; 10]), t0);
        expected += result.bandwidth.per_packet_primary.iter().sum::<f64>();
        assert!(result.bandwidth.per_packet_percent_diff.iter().all(|d| *d < 0.0));
    }

    assert!((shaper.total_primary_bandwidth() - expected).abs() < 1e-6);
}

/// Test: elapsed time is measured, not fixed
#[test]
fn test_elapsed_is_measured() {
    let mut shaper = PacketShaper::new(2, 2.0).unwrap();
    let batch = packets_of(&[5; 10]);

    let before = Instant::now();
    let result = shaper.process(&batch);
    let outer = before.elapsed();

    assert!(result.elapsed <= outer);
    assert!(result.elapsed_millis() >= 0.0);
}

/// Test: a large batch takes a non-zero, measured amount of time
#[test]
fn test_large_batch_elapsed_nonzero() {
    let mut shaper =
        PacketShaper::with_coverage(10_000, 0.0, CoveragePolicy::AppendNatural).unwrap();
    let batch = packets_of(&[1024; 10_000]);

    let before = Instant::now();
    let result = shaper.process(&batch);
    let outer = before.elapsed();

    assert_eq!(result.accepted.len(), batch.len());
    assert!(result.elapsed > Duration::ZERO);
    assert!(result.elapsed_millis() > 0.0);
    assert!(result.elapsed <= outer);
}

/// Test: zero leak rate never recovers once full
#[test]
fn test_zero_rate_stays_full() {
    let t0 = Instant::now();
    let mut shaper = shaper_at(2, 0.0, t0);
    shaper.process_at(&packets_of(&[1, 1]), t0);

    for hours in 1..4 {
        let later = t0 + Duration::from_secs(hours * 3600);
        let result = shaper.process_at(&packets_of(&[1]), later);
        assert!(result.accepted.is_empty());
        assert_eq!(result.dropped.len(), 1);
    }
}

/// Test: shared handle serializes callers on one bucket
#[test]
fn test_shared_handle_single_bucket() {
    let t0 = Instant::now();
    let shared = SharedShaper::new(shaper_at(3, 0.0, t0));
    let other = shared.clone();

    let a = shared.process_at(&packets_of(&[1, 2]), t0);
    let b = other.process_at(&packets_of(&[3, 4]), t0);

    assert_eq!(a.accepted.len() + b.accepted.len(), 3);
    assert_eq!(b.dropped.len(), 1);
    assert_eq!(shared.bucket_len(), 3);
}
