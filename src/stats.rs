//! Draw batching statistics for debugging and performance analysis.
//!
//! Enable counters by compiling with the `draw-stats` feature:
//! ```bash
//! cargo run --example table_demo --features draw-stats
//! ```
//!
//! A summary is logged at most once per second from [`end_frame`], showing:
//! - Layout passes
//! - Channel splits and the channels they allocated
//! - Channel merge groups and how many channels they absorbed
//! - Draw commands before and after merging

/// Snapshot of accumulated draw statistics.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub frames: u64,
    pub layouts: u64,
    pub splits: u64,
    pub channels_allocated: u64,
    pub merges: u64,
    pub cmds_before_merge: u64,
    pub cmds_after_merge: u64,
    pub merge_groups: u64,
    pub channels_regrouped: u64,
}

#[cfg(feature = "draw-stats")]
mod inner {
    use std::cell::RefCell;
    use std::time::Instant;

    thread_local! {
        static STATS: RefCell<DrawStats> = RefCell::new(DrawStats::new());
    }

    struct DrawStats {
        counters: super::StatsSnapshot,
        last_print: Instant,
    }

    impl DrawStats {
        fn new() -> Self {
            Self {
                counters: super::StatsSnapshot::default(),
                last_print: Instant::now(),
            }
        }

        fn reset(&mut self) {
            self.counters = super::StatsSnapshot::default();
            self.last_print = Instant::now();
        }
    }

    /// Record one table layout pass.
    #[inline]
    pub fn record_layout() {
        STATS.with(|s| s.borrow_mut().counters.layouts += 1);
    }

    /// Record a splitter being divided into `channels` channels.
    #[inline]
    pub fn record_split(channels: usize) {
        STATS.with(|s| {
            let mut stats = s.borrow_mut();
            stats.counters.splits += 1;
            stats.counters.channels_allocated += channels as u64;
        });
    }

    /// Record a splitter merge and the command counts around it.
    #[inline]
    pub fn record_merge(cmds_before: usize, cmds_after: usize) {
        STATS.with(|s| {
            let mut stats = s.borrow_mut();
            stats.counters.merges += 1;
            stats.counters.cmds_before_merge += cmds_before as u64;
            stats.counters.cmds_after_merge += cmds_after as u64;
        });
    }

    /// Record a non-empty merge group and the channels it pulled together.
    #[inline]
    pub fn record_merge_group(channels: usize) {
        STATS.with(|s| {
            let mut stats = s.borrow_mut();
            stats.counters.merge_groups += 1;
            stats.counters.channels_regrouped += channels as u64;
        });
    }

    /// Return a snapshot of the current stats (for testing).
    pub fn get_stats() -> super::StatsSnapshot {
        STATS.with(|s| s.borrow().counters.clone())
    }

    /// Reset all stats to zero (for test isolation).
    pub fn reset_stats() {
        STATS.with(|s| s.borrow_mut().reset());
    }

    /// Called at the end of each frame to potentially log stats.
    pub fn end_frame() {
        STATS.with(|s| {
            let mut stats = s.borrow_mut();
            stats.counters.frames += 1;

            if stats.last_print.elapsed().as_secs() >= 1 {
                let c = &stats.counters;
                let saved = c.cmds_before_merge.saturating_sub(c.cmds_after_merge);
                let saved_rate = if c.cmds_before_merge > 0 {
                    (saved as f64 / c.cmds_before_merge as f64) * 100.0
                } else {
                    0.0
                };
                log::info!(
                    "[Draw Stats] frames={} layouts={} splits={} channels={}",
                    c.frames,
                    c.layouts,
                    c.splits,
                    c.channels_allocated
                );
                log::info!(
                    "  merge: merges={} groups={} regrouped={} cmds={}->{} saved={:.1}%",
                    c.merges,
                    c.merge_groups,
                    c.channels_regrouped,
                    c.cmds_before_merge,
                    c.cmds_after_merge,
                    saved_rate
                );
                stats.reset();
            }
        });
    }
}

#[cfg(feature = "draw-stats")]
pub use inner::*;

// No-op implementations when feature is disabled - these get completely inlined away

#[cfg(not(feature = "draw-stats"))]
#[inline(always)]
pub fn get_stats() -> StatsSnapshot {
    StatsSnapshot::default()
}

#[cfg(not(feature = "draw-stats"))]
#[inline(always)]
pub fn reset_stats() {}

#[cfg(not(feature = "draw-stats"))]
#[inline(always)]
pub fn record_layout() {}

#[cfg(not(feature = "draw-stats"))]
#[inline(always)]
pub fn record_split(_channels: usize) {}

#[cfg(not(feature = "draw-stats"))]
#[inline(always)]
pub fn record_merge(_cmds_before: usize, _cmds_after: usize) {}

#[cfg(not(feature = "draw-stats"))]
#[inline(always)]
pub fn record_merge_group(_channels: usize) {}

#[cfg(not(feature = "draw-stats"))]
#[inline(always)]
pub fn end_frame() {}

#[cfg(test)]
#[cfg(feature = "draw-stats")]
mod tests {
    use super::*;

    /// Reset stats before each test to ensure isolation
    /// (tests share the thread-local when run on the same thread).
    fn setup() {
        reset_stats();
    }

    #[test]
    fn test_split_counts_channels() {
        setup();
        record_split(4);
        record_split(6);
        let s = get_stats();
        assert_eq!(s.splits, 2);
        assert_eq!(s.channels_allocated, 10);
    }

    #[test]
    fn test_merge_counts_commands() {
        setup();
        record_merge(12, 3);
        let s = get_stats();
        assert_eq!(s.merges, 1);
        assert_eq!(s.cmds_before_merge, 12);
        assert_eq!(s.cmds_after_merge, 3);
    }

    #[test]
    fn test_merge_group_counter() {
        setup();
        record_merge_group(3);
        record_merge_group(1);
        let s = get_stats();
        assert_eq!(s.merge_groups, 2);
        assert_eq!(s.channels_regrouped, 4);
    }

    #[test]
    fn test_reset() {
        setup();
        record_layout();
        record_split(2);
        reset_stats();
        assert_eq!(get_stats(), StatsSnapshot::default());
    }
}
