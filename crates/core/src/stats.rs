//! Derived statistics and reporting.
//!
//! Nothing here is stored state; both structures are recomputed from the models
//! whenever they are requested. It provides:
//! 1. **Scheduler:** Process counts, average wait and turnaround, CPU utilization.
//! 2. **Memory:** Capacity, usage, largest free block, and external fragmentation.
//! 3. **Reports:** Fixed-width text sections for terminal output.

use std::fmt::Write as _;

use serde::Serialize;

use crate::mem::MemoryBlock;
use crate::sched::{Process, ProcessState};

const RULE: &str = "==========================================================";
const THIN_RULE: &str = "----------------------------------------------------------";

/// Scheduler statistics at a point in time.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStats {
    /// Logical clock (ms).
    pub clock: u64,
    /// Processes created.
    pub total: usize,
    /// Processes in the Ready state.
    pub ready: usize,
    /// Processes in the Running state (0 or 1).
    pub running: usize,
    /// Processes in the Completed state.
    pub completed: usize,
    /// Mean wait of completed processes (ms).
    pub average_wait_ms: f64,
    /// Mean turnaround of completed processes (ms).
    pub average_turnaround_ms: f64,
    /// Logical time the CPU spent executing (ms).
    pub busy_ms: u64,
    /// `busy_ms` as a percentage of the clock.
    pub utilization_pct: f64,
}

impl SchedulerStats {
    /// Computes statistics for `processes` at logical time `clock`.
    pub fn collect(processes: &[Process], clock: u64) -> Self {
        let mut stats = Self {
            clock,
            total: processes.len(),
            ..Self::default()
        };
        let mut wait_sum = 0_u64;
        let mut turnaround_sum = 0_u64;

        for process in processes {
            match process.state() {
                ProcessState::Ready => stats.ready += 1,
                ProcessState::Running => {
                    stats.running += 1;
                    let started = process.start_time().unwrap_or(clock);
                    stats.busy_ms += clock.saturating_sub(started).min(process.burst_time());
                }
                ProcessState::Completed => {
                    stats.completed += 1;
                    stats.busy_ms += process.burst_time();
                    wait_sum += process.wait_time();
                    turnaround_sum += process.turnaround().unwrap_or(0);
                }
            }
        }

        if stats.completed > 0 {
            stats.average_wait_ms = wait_sum as f64 / stats.completed as f64;
            stats.average_turnaround_ms = turnaround_sum as f64 / stats.completed as f64;
        }
        if clock > 0 {
            stats.utilization_pct = (stats.busy_ms as f64 / clock as f64 * 100.0).min(100.0);
        }
        stats
    }

    /// Renders the scheduler report.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "FCFS SCHEDULER STATISTICS");
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "sim_time                 {} ms", self.clock);
        let _ = writeln!(out, "processes.total          {}", self.total);
        let _ = writeln!(out, "processes.ready          {}", self.ready);
        let _ = writeln!(out, "processes.running        {}", self.running);
        let _ = writeln!(out, "processes.completed      {}", self.completed);
        let _ = writeln!(out, "{THIN_RULE}");
        let _ = writeln!(out, "wait.avg                 {:.1} ms", self.average_wait_ms);
        let _ = writeln!(
            out,
            "turnaround.avg           {:.1} ms",
            self.average_turnaround_ms
        );
        let _ = writeln!(
            out,
            "cpu.busy                 {} ms ({:.2}%)",
            self.busy_ms, self.utilization_pct
        );
        let _ = writeln!(out, "{RULE}");
        out
    }

    /// Prints the scheduler report to stdout.
    pub fn print(&self) {
        print!("{}", self.report());
    }
}

/// Memory statistics at a point in time.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    /// Sum of all block sizes (KB).
    pub total_kb: u64,
    /// Sum of Used block sizes (KB).
    pub used_kb: u64,
    /// `total_kb - used_kb`.
    pub free_kb: u64,
    /// Largest Free block (KB), 0 if none.
    pub largest_free_kb: u64,
    /// Number of Free blocks.
    pub free_blocks: usize,
    /// Number of Used blocks.
    pub used_blocks: usize,
    /// Sum of granted request sizes (KB).
    pub requested_kb: u64,
    /// Capacity inside Used blocks not covered by their requests (KB).
    pub internal_waste_kb: u64,
    /// `(free_kb - largest_free_kb) / free_kb * 100`, or 0 with fewer than two Free blocks.
    pub fragmentation_pct: f64,
    /// `used_kb / total_kb * 100`, or 0 for an empty block set.
    pub utilization_pct: f64,
}

impl MemoryStats {
    /// Computes statistics over `blocks`.
    pub fn collect(blocks: &[MemoryBlock]) -> Self {
        let mut stats = Self::default();
        let mut free_sum = 0_u64;

        for block in blocks {
            let size = u64::from(block.size());
            stats.total_kb += size;
            if block.is_free() {
                stats.free_blocks += 1;
                free_sum += size;
                stats.largest_free_kb = stats.largest_free_kb.max(size);
            } else {
                stats.used_blocks += 1;
                stats.used_kb += size;
                stats.requested_kb += u64::from(block.granted().unwrap_or(0));
                stats.internal_waste_kb += u64::from(block.internal_waste());
            }
        }
        stats.free_kb = stats.total_kb - stats.used_kb;

        if stats.free_blocks > 1 && stats.free_kb > 0 {
            stats.fragmentation_pct =
                (free_sum - stats.largest_free_kb) as f64 / stats.free_kb as f64 * 100.0;
        }
        if stats.total_kb > 0 {
            stats.utilization_pct = stats.used_kb as f64 / stats.total_kb as f64 * 100.0;
        }
        stats
    }

    /// Renders the memory report.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "BEST-FIT MEMORY STATISTICS");
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "mem.total                {} KB", self.total_kb);
        let _ = writeln!(
            out,
            "mem.used                 {} KB ({:.1}%)",
            self.used_kb, self.utilization_pct
        );
        let _ = writeln!(out, "mem.free                 {} KB", self.free_kb);
        let _ = writeln!(out, "mem.largest_free         {} KB", self.largest_free_kb);
        let _ = writeln!(
            out,
            "blocks                   {} used / {} free",
            self.used_blocks, self.free_blocks
        );
        let _ = writeln!(out, "{THIN_RULE}");
        let _ = writeln!(out, "requested                {} KB", self.requested_kb);
        let _ = writeln!(out, "internal_waste           {} KB", self.internal_waste_kb);
        let _ = writeln!(out, "fragmentation            {:.1}%", self.fragmentation_pct);
        let _ = writeln!(out, "{RULE}");
        out
    }

    /// Prints the memory report to stdout.
    pub fn print(&self) {
        print!("{}", self.report());
    }
}

/// Renders a block table, one row per block.
pub fn block_table(blocks: &[MemoryBlock]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<6} {:>8}  {:<6} {:<16} {:>8}",
        "block", "size", "status", "owner", "granted"
    );
    for block in blocks {
        let granted = block
            .granted()
            .map_or_else(|| "-".to_owned(), |g| format!("{g}KB"));
        let _ = writeln!(
            out,
            "  {:<6} {:>6}KB  {:<6} {:<16} {:>8}",
            block.id(),
            block.size(),
            format!("{:?}", block.status()),
            block.owner().unwrap_or("-"),
            granted
        );
    }
    out
}

/// Renders a process table, one row per process in creation order.
pub fn process_table(processes: &[Process]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<5} {:<10} {:>9} {:>8} {:>8} {:>11} {:>11}",
        "pid", "state", "arrival", "burst", "wait", "completion", "turnaround"
    );
    for p in processes {
        let turnaround = p
            .turnaround()
            .map_or_else(|| "-".to_owned(), |t| t.to_string());
        let _ = writeln!(
            out,
            "  {:<5} {:<10} {:>9} {:>8} {:>8} {:>11} {:>11}",
            p.pid(),
            p.state().to_string(),
            p.arrival_time(),
            p.burst_time(),
            p.wait_time(),
            p.completion_time(),
            turnaround
        );
    }
    out
}
