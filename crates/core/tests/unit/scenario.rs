//! # Allocator Scenario
//!
//! Twelve known blocks; allocate 64 KB twice, free once, and check statistics at
//! each step.

use ossim_core::mem::FreeOutcome;
use pretty_assertions::assert_eq;

use crate::common::harness::{SCENARIO_BLOCKS, scenario_allocator};

#[test]
fn test_two_allocations_then_free() {
    let mut allocator = scenario_allocator();
    let total: u64 = SCENARIO_BLOCKS.iter().map(|&s| u64::from(s)).sum();
    assert_eq!(allocator.compute_stats().total_kb, total);
    assert_eq!(allocator.compute_stats().used_kb, 0);

    assert_eq!(allocator.allocate(64, "P1").block(), Some(1));
    assert_eq!(allocator.allocate(64, "P2").block(), Some(4));

    let stats = allocator.compute_stats();
    assert_eq!(stats.used_kb, 128);
    assert_eq!(stats.requested_kb, 128);
    assert_eq!(stats.free_kb, total - 128);
    assert_eq!(stats.largest_free_kb, 180);

    assert_eq!(
        allocator.free(),
        FreeOutcome::Freed {
            block: 1,
            block_size: 64,
            owner: "P1".into(),
        }
    );

    let stats = allocator.compute_stats();
    assert_eq!(stats.used_kb, 64);
    assert_eq!(stats.used_blocks, 1);
    assert_eq!(stats.free_blocks, 11);
    let expected = (total - 64 - 180) as f64 / (total - 64) as f64 * 100.0;
    assert!((stats.fragmentation_pct - expected).abs() < 1e-9);

    assert_eq!(
        allocator.log().messages(),
        vec![
            "Allocated 64KB in Block 1 (64KB) for P1",
            "Allocated 64KB in Block 4 (64KB) for P2",
            "Freed Block 1 (64KB) from P1",
        ]
    );
}

#[test]
fn test_freed_block_is_reused_first() {
    let mut allocator = scenario_allocator();
    let _ = allocator.allocate(64, "P1");
    let _ = allocator.allocate(64, "P2");
    let _ = allocator.free();

    assert_eq!(allocator.allocate(60, "P3").block(), Some(1));
    assert_eq!(allocator.allocate(60, "P4").block(), Some(7));
}
