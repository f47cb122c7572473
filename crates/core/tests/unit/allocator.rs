//! # Best-Fit Allocator Tests

use ossim_core::config::MemoryConfig;
use ossim_core::mem::{AllocationOutcome, BlockStatus, FreeOutcome, MemoryAllocator};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{ScriptedRng, init_tracing};
use crate::common::mocks::MockRng;

#[rstest]
#[case::smallest_that_fits(&[80, 100, 64], 70, Some(0))]
#[case::exact_fit(&[128, 64, 100], 64, Some(1))]
#[case::tie_goes_to_lowest_id(&[100, 80, 80], 70, Some(1))]
#[case::zero_request(&[80, 100, 64], 0, Some(2))]
#[case::nothing_fits(&[50, 60], 70, None)]
fn test_best_fit_choice(
    #[case] sizes: &[u32],
    #[case] request: u32,
    #[case] expected: Option<usize>,
) {
    init_tracing();
    let mut allocator = MemoryAllocator::with_sizes(sizes);
    let outcome = allocator.allocate(request, "P1");
    assert_eq!(outcome.block(), expected);
}

#[test]
fn test_allocate_marks_block_used() {
    let mut allocator = MemoryAllocator::with_sizes(&[80, 100, 64]);
    let outcome = allocator.allocate(70, "P1");
    assert_eq!(
        outcome,
        AllocationOutcome::Allocated {
            block: 0,
            block_size: 80,
            owner: "P1".into(),
        }
    );

    let block = allocator.block(0).unwrap();
    assert_eq!(block.status(), BlockStatus::Used);
    assert_eq!(block.owner(), Some("P1"));
    assert_eq!(block.granted(), Some(70));
    assert_eq!(block.internal_waste(), 10);
    assert_eq!(
        allocator.log().messages(),
        vec!["Allocated 70KB in Block 0 (80KB) for P1"]
    );
}

#[test]
fn test_used_blocks_are_skipped() {
    let mut allocator = MemoryAllocator::with_sizes(&[80, 100, 64]);
    let _ = allocator.allocate(70, "P1");
    assert_eq!(allocator.allocate(70, "P2").block(), Some(1));
    assert_eq!(allocator.allocate(70, "P3").block(), None);
}

#[test]
fn test_failed_allocation_does_not_mutate_blocks() {
    let mut allocator = MemoryAllocator::with_sizes(&[80, 100, 64]);
    let _ = allocator.allocate(64, "P1");
    let before = allocator.blocks().to_vec();

    let outcome = allocator.allocate(500, "Huge");
    assert_eq!(outcome, AllocationOutcome::Failed { requested: 500 });
    assert!(!outcome.is_allocated());
    assert_eq!(allocator.blocks(), before.as_slice());
    assert_eq!(
        allocator.log().last().map(|e| e.event.to_string()),
        Some("Allocation failed: No block large enough for 500KB request".to_owned())
    );
}

#[test]
fn test_free_releases_lowest_used_id() {
    let mut allocator = MemoryAllocator::with_sizes(&[10, 10, 100, 10, 10, 200]);
    assert_eq!(allocator.allocate(90, "A").block(), Some(2));
    assert_eq!(allocator.allocate(150, "B").block(), Some(5));

    assert_eq!(
        allocator.free(),
        FreeOutcome::Freed {
            block: 2,
            block_size: 100,
            owner: "A".into(),
        }
    );
    let freed = allocator.block(2).unwrap();
    assert!(freed.is_free());
    assert_eq!(freed.owner(), None);
    assert_eq!(freed.granted(), None);

    assert_eq!(allocator.free().block(), Some(5));
}

#[test]
fn test_free_without_used_block_is_silent() {
    let mut allocator = MemoryAllocator::with_sizes(&[64, 64]);
    assert_eq!(allocator.free(), FreeOutcome::NoTarget);
    assert!(allocator.log().is_empty());
}

#[test]
fn test_empty_label_gets_generated_name() {
    let mut rng = MockRng::new();
    let _ = rng.expect_next_u64().times(1).return_const(4242_u64);
    let config = MemoryConfig {
        block_sizes: Some(vec![64]),
        ..MemoryConfig::default()
    };
    let mut allocator = MemoryAllocator::new(config, Box::new(rng));

    let outcome = allocator.allocate(32, "   ");
    assert_eq!(outcome.block(), Some(0));
    assert_eq!(allocator.block(0).unwrap().owner(), Some("Process-242"));
}

#[test]
fn test_failed_allocation_is_always_logged_and_draws_no_label() {
    let mut rng = MockRng::new();
    let _ = rng.expect_next_u64().times(1).return_const(7_u64);
    let config = MemoryConfig {
        block_sizes: Some(vec![64, 32]),
        ..MemoryConfig::default()
    };
    let mut allocator = MemoryAllocator::new(config, Box::new(rng));

    assert!(!allocator.allocate(100, "").is_allocated());
    assert!(!allocator.allocate(65, "").is_allocated());
    assert_eq!(allocator.log().len(), 2);
    assert!(allocator.blocks().iter().all(|b| b.is_free()));

    assert_eq!(allocator.allocate(40, "").block(), Some(0));
    assert_eq!(allocator.block(0).unwrap().owner(), Some("Process-7"));
    assert_eq!(
        allocator.log().messages(),
        vec![
            "Allocation failed: No block large enough for 100KB request",
            "Allocation failed: No block large enough for 65KB request",
            "Allocated 40KB in Block 0 (64KB) for Process-7",
        ]
    );
}

#[test]
fn test_label_is_trimmed() {
    let mut allocator = MemoryAllocator::with_sizes(&[64]);
    let _ = allocator.allocate(32, "  P1 ");
    assert_eq!(allocator.block(0).unwrap().owner(), Some("P1"));
}

#[test]
fn test_random_block_sizes_respect_config() {
    let config = MemoryConfig::default();
    let allocator = MemoryAllocator::new(config, Box::new(ScriptedRng::new(vec![0, 127, 128, 5])));
    let sizes: Vec<u32> = allocator.blocks().iter().map(|b| b.size()).collect();

    assert_eq!(sizes.len(), 12);
    assert_eq!(&sizes[..4], &[64, 191, 64, 69]);
    assert!(sizes.iter().all(|s| (64..=191).contains(s)));
    let ids: Vec<usize> = allocator.blocks().iter().map(|b| b.id()).collect();
    assert_eq!(ids, (0..12).collect::<Vec<_>>());
}

#[test]
fn test_tick_advances_system_time_and_stamps_log() {
    let mut allocator = MemoryAllocator::with_sizes(&[64]);
    assert_eq!(allocator.tick(), 100);
    assert_eq!(allocator.tick(), 200);
    let _ = allocator.allocate(64, "P1");
    assert_eq!(allocator.log().last().map(|e| e.at), Some(200));
}

#[test]
fn test_reset_frees_blocks_and_keeps_sizes() {
    let mut allocator = MemoryAllocator::with_sizes(&[80, 100, 64]);
    let _ = allocator.allocate(70, "P1");
    let _ = allocator.allocate(90, "P2");
    let _ = allocator.tick();

    allocator.reset();
    assert!(allocator.blocks().iter().all(|b| b.is_free()));
    assert!(allocator.log().is_empty());
    assert_eq!(allocator.system_time(), 0);
    let sizes: Vec<u32> = allocator.blocks().iter().map(|b| b.size()).collect();
    assert_eq!(sizes, vec![80, 100, 64]);

    let once = allocator.snapshot();
    allocator.reset();
    assert_eq!(allocator.snapshot(), once);
}

#[test]
fn test_snapshot_uses_process_field_names() {
    let mut allocator = MemoryAllocator::with_sizes(&[80, 100]);
    let _ = allocator.allocate(70, "P1");

    let json = serde_json::to_value(allocator.snapshot()).unwrap();
    assert_eq!(json["blocks"][0]["status"], "Used");
    assert_eq!(json["blocks"][0]["processId"], "P1");
    assert_eq!(json["blocks"][0]["processSize"], 70);
    assert!(json["blocks"][1]["processId"].is_null());
    assert_eq!(json["stats"]["usedKb"], 80);
    assert_eq!(json["systemTime"], 0);
}
