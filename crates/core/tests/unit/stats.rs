//! # Statistics Tests

use ossim_core::mem::MemoryAllocator;
use ossim_core::sim::ClockDriver;
use ossim_core::stats::{MemoryStats, block_table, process_table};
use pretty_assertions::assert_eq;

use crate::common::harness::three_process_scheduler;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_empty_block_set() {
    let stats = MemoryStats::collect(&[]);
    assert_eq!(stats, MemoryStats::default());
}

#[test]
fn test_fragmentation_zero_with_one_free_block() {
    let mut allocator = MemoryAllocator::with_sizes(&[100, 50]);
    let _ = allocator.allocate(100, "P1");
    let stats = allocator.compute_stats();
    assert_eq!(stats.free_blocks, 1);
    assert_eq!(stats.fragmentation_pct, 0.0);
}

#[test]
fn test_fragmentation_zero_with_no_free_block() {
    let mut allocator = MemoryAllocator::with_sizes(&[100, 50]);
    let _ = allocator.allocate(100, "P1");
    let _ = allocator.allocate(50, "P2");
    let stats = allocator.compute_stats();
    assert_eq!(stats.free_blocks, 0);
    assert_eq!(stats.free_kb, 0);
    assert_eq!(stats.largest_free_kb, 0);
    assert_eq!(stats.fragmentation_pct, 0.0);
    assert!(approx(stats.utilization_pct, 100.0));
}

#[test]
fn test_fragmentation_with_scattered_free_blocks() {
    let allocator = MemoryAllocator::with_sizes(&[100, 50]);
    let stats = allocator.compute_stats();
    assert_eq!(stats.total_kb, 150);
    assert_eq!(stats.largest_free_kb, 100);
    assert!(approx(stats.fragmentation_pct, 50.0 / 150.0 * 100.0));
}

#[test]
fn test_requested_and_internal_waste() {
    let mut allocator = MemoryAllocator::with_sizes(&[80, 100, 64]);
    let _ = allocator.allocate(70, "P1");
    let _ = allocator.allocate(60, "P2");
    let stats = allocator.compute_stats();

    assert_eq!(stats.used_kb, 144);
    assert_eq!(stats.requested_kb, 130);
    assert_eq!(stats.internal_waste_kb, 14);
    assert_eq!(stats.used_blocks, 2);
    assert_eq!(stats.free_kb, 100);
}

#[test]
fn test_scheduler_stats_after_session() {
    let mut scheduler = three_process_scheduler();
    let _ = ClockDriver::default().run(&mut scheduler);
    let stats = scheduler.stats();

    assert_eq!(stats.clock, 9100);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.completed, 3);
    assert_eq!(stats.ready, 0);
    assert_eq!(stats.running, 0);
    assert_eq!(stats.busy_ms, 6000);
    assert!(approx(stats.average_wait_ms, 10_300.0 / 3.0));
    assert!(approx(stats.average_turnaround_ms, 16_300.0 / 3.0));
    assert!(approx(stats.utilization_pct, 6000.0 / 9100.0 * 100.0));
}

#[test]
fn test_scheduler_stats_count_partial_execution() {
    let mut scheduler = three_process_scheduler();
    scheduler.start();
    for _ in 0..20 {
        let _ = scheduler.tick();
    }
    let stats = scheduler.stats();
    assert_eq!(stats.running, 1);
    assert_eq!(stats.ready, 2);
    assert_eq!(stats.busy_ms, 900);
    assert_eq!(stats.average_wait_ms, 0.0);
}

#[test]
fn test_reports_render() {
    let mut scheduler = three_process_scheduler();
    let _ = ClockDriver::default().run(&mut scheduler);
    let report = scheduler.stats().report();
    assert!(report.contains("FCFS SCHEDULER STATISTICS"));
    assert!(report.contains("processes.completed      3"));

    let table = process_table(scheduler.processes());
    assert_eq!(table.lines().count(), 4);
    assert!(table.contains("Completed"));

    let mut allocator = MemoryAllocator::with_sizes(&[80, 100]);
    let _ = allocator.allocate(70, "P1");
    let report = allocator.compute_stats().report();
    assert!(report.contains("BEST-FIT MEMORY STATISTICS"));
    assert!(report.contains("mem.total                180 KB"));

    let table = block_table(allocator.blocks());
    assert_eq!(table.lines().count(), 3);
    assert!(table.contains("P1"));
}
