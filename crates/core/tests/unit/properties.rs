//! # Property Tests
//!
//! Invariants that must hold for any seed and any operation sequence.

use ossim_core::config::{Config, Speed};
use ossim_core::mem::MemoryAllocator;
use ossim_core::sched::{FcfsScheduler, ProcessState};
use ossim_core::sim::ClockDriver;
use proptest::prelude::*;

fn speed_strategy() -> impl Strategy<Value = Speed> {
    prop::sample::select(Speed::ALL.to_vec())
}

#[derive(Debug, Clone)]
enum Op {
    Alloc(u32),
    Free,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0_u32..250).prop_map(Op::Alloc),
        1 => Just(Op::Free),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_fcfs_session_invariants(seed in any::<u64>(), count in 1_usize..8, speed in speed_strategy()) {
        let mut config = Config::default();
        config.general.seed = seed;
        let mut scheduler = FcfsScheduler::from_config(&config);
        scheduler.set_speed(speed);
        for _ in 0..count {
            let _ = scheduler.add_process();
        }

        let mut max_running = 0;
        let summary = ClockDriver::default().run_with(&mut scheduler, |s| {
            let running = s
                .processes()
                .iter()
                .filter(|p| p.state() == ProcessState::Running)
                .count();
            max_running = max_running.max(running);
        });

        prop_assert!(summary.drained);
        prop_assert!(max_running <= 1);

        let processes = scheduler.processes();
        for (i, p) in processes.iter().enumerate() {
            prop_assert_eq!(p.pid() as usize, i + 1);
            let start = p.start_time().unwrap_or_default();
            prop_assert_eq!(p.completion_time(), start + p.burst_time());
            prop_assert!(p.completion_time() >= p.arrival_time() + p.burst_time());
            prop_assert_eq!(p.wait_time(), start - p.arrival_time());
            prop_assert_eq!(p.burst_time() % 1000, 0);
            prop_assert!((1000..=5000).contains(&p.burst_time()));
        }
        for pair in processes.windows(2) {
            prop_assert!(pair[0].arrival_time() <= pair[1].arrival_time());
            prop_assert!(pair[0].start_time() < pair[1].start_time());
            prop_assert!(pair[0].completion_time() <= pair[1].start_time().unwrap_or_default());
        }
    }

    #[test]
    fn prop_same_seed_replays(seed in any::<u64>()) {
        let mut config = Config::default();
        config.general.seed = seed;
        let run = || {
            let mut scheduler = FcfsScheduler::from_config(&config);
            for _ in 0..4 {
                let _ = scheduler.add_process();
            }
            let _ = ClockDriver::default().run(&mut scheduler);
            scheduler.snapshot()
        };
        prop_assert_eq!(run(), run());
        prop_assert_eq!(
            MemoryAllocator::from_config(&config).snapshot(),
            MemoryAllocator::from_config(&config).snapshot()
        );
    }

    #[test]
    fn prop_allocator_invariants(seed in any::<u64>(), ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut config = Config::default();
        config.general.seed = seed;
        let mut allocator = MemoryAllocator::from_config(&config);
        let sizes: Vec<u32> = allocator.blocks().iter().map(|b| b.size()).collect();

        for op in ops {
            let before = allocator.blocks().to_vec();
            match op {
                Op::Alloc(request) => {
                    let best = before
                        .iter()
                        .filter(|b| b.is_free() && b.size() >= request)
                        .map(|b| b.size())
                        .min();
                    let outcome = allocator.allocate(request, "");
                    match (outcome.block(), best) {
                        (Some(id), Some(size)) => {
                            let block = allocator.block(id).unwrap();
                            prop_assert_eq!(block.size(), size);
                            prop_assert!(before[id].is_free());
                            prop_assert!(before[..id].iter().all(|b| !b.is_free() || b.size() != size));
                            prop_assert_eq!(block.granted(), Some(request));
                        }
                        (None, None) => {
                            prop_assert_eq!(allocator.blocks(), before.as_slice());
                        }
                        (chosen, expected) => {
                            prop_assert!(false, "chose {:?}, expected size {:?}", chosen, expected);
                        }
                    }
                }
                Op::Free => {
                    let lowest_used = before.iter().position(|b| !b.is_free());
                    prop_assert_eq!(allocator.free().block(), lowest_used);
                }
            }

            let current: Vec<u32> = allocator.blocks().iter().map(|b| b.size()).collect();
            prop_assert_eq!(&current, &sizes);
            for block in allocator.blocks() {
                prop_assert_eq!(block.is_free(), block.owner().is_none());
                prop_assert!(block.granted().unwrap_or(0) <= block.size());
            }
            let stats = allocator.compute_stats();
            prop_assert_eq!(stats.used_kb + stats.free_kb, stats.total_kb);
            prop_assert!((0.0..100.0).contains(&stats.fragmentation_pct));
            if stats.free_blocks < 2 {
                prop_assert!(stats.fragmentation_pct == 0.0);
            }
        }
    }
}
