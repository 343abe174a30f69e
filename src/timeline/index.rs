/*!
 * Active-cue lookup over one track.
 *
 * Cues are kept in stable start order alongside a running maximum of their
 * end times. The first position whose running maximum reaches `t` holds the
 * answer's start time: every earlier cue has already ended, and if that cue
 * has not started yet no later cue has either. Cues sharing that start are
 * then compared by index, so "earliest start, then lowest index" stays exact
 * when cues overlap.
 *
 * The position of the last query is remembered. Forward queries walk from it
 * for a few steps, so steady playback costs O(1) amortized per tick; longer
 * jumps and backward seeks fall back to a binary search.
 */

use std::cell::Cell;

use log::trace;

use crate::timeline::cue::{Cue, ms_to_seconds};

/// Steps the forward cursor may take before switching to binary search
pub const DEFAULT_FORWARD_SCAN_LIMIT: usize = 8;

/// Lookup counters, for checking the cost of playback queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupStats {
    /// Calls to `active_at`
    pub queries: u64,
    /// Queries resolved by walking forward from the previous position
    pub cursor_hits: u64,
    /// Queries that needed a binary search
    pub binary_searches: u64,
    /// Comparisons against the end-time table, both paths together
    pub probes: u64,
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    last_t: f64,
    position: usize,
}

/// Immutable index over one track's cues
#[derive(Debug)]
pub struct TimelineIndex {
    cues: Vec<Cue>,
    max_end_ms: Vec<u64>,
    scan_limit: usize,
    cursor: Cell<Option<Cursor>>,
    stats: Cell<LookupStats>,
}

impl TimelineIndex {
    /// Build an index with the default forward scan limit
    pub fn new(cues: Vec<Cue>) -> Self {
        Self::with_scan_limit(cues, DEFAULT_FORWARD_SCAN_LIMIT)
    }

    /// Build an index; `scan_limit` bounds the forward walk per query
    pub fn with_scan_limit(mut cues: Vec<Cue>, scan_limit: usize) -> Self {
        cues.sort_by_key(|cue| cue.start_ms);

        let mut running = 0u64;
        let max_end_ms = cues
            .iter()
            .map(|cue| {
                running = running.max(cue.end_ms);
                running
            })
            .collect();

        Self {
            cues,
            max_end_ms,
            scan_limit,
            cursor: Cell::new(None),
            stats: Cell::new(LookupStats::default()),
        }
    }

    /// Number of cues
    pub fn size(&self) -> usize {
        self.cues.len()
    }

    /// Number of cues
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Cues in start order, ties in the order they were given
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// End of the last-ending cue, in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.max_end_ms.last().copied().unwrap_or(0)
    }

    /// The cue covering `t` seconds, if any. Never fails.
    pub fn active_at(&self, t: f64) -> Option<&Cue> {
        let mut stats = self.stats.get();
        stats.queries += 1;

        if !t.is_finite() || t < 0.0 {
            self.stats.set(stats);
            return None;
        }

        let position = match self.cursor.get() {
            Some(cursor) if t >= cursor.last_t => self.walk_forward(cursor.position, t, &mut stats),
            _ => self.search_from(0, t, &mut stats),
        };

        self.cursor.set(Some(Cursor { last_t: t, position }));
        self.stats.set(stats);

        let found = self.resolve_tie(position, t);
        trace!("active_at({}) -> {:?}", t, found.map(|cue| cue.index));
        found
    }

    /// The cue covering `ms` milliseconds, if any
    pub fn active_at_ms(&self, ms: u64) -> Option<&Cue> {
        self.active_at(ms_to_seconds(ms))
    }

    /// First cue starting strictly after `t`
    pub fn next_after(&self, t: f64) -> Option<&Cue> {
        let position = self.cues.partition_point(|cue| ms_to_seconds(cue.start_ms) <= t);
        self.cues.get(position)
    }

    /// Latest-starting cue that has fully ended before `t`
    pub fn previous_before(&self, t: f64) -> Option<&Cue> {
        let started = self.cues.partition_point(|cue| ms_to_seconds(cue.start_ms) < t);
        self.cues[..started]
            .iter()
            .rev()
            .find(|cue| ms_to_seconds(cue.end_ms) < t)
    }

    /// Lookup counters since the index was built or last reset
    pub fn stats(&self) -> LookupStats {
        self.stats.get()
    }

    pub fn reset_stats(&self) {
        self.stats.set(LookupStats::default());
    }

    // Among cues sharing the candidate's start, the lowest covering index wins
    fn resolve_tie(&self, position: usize, t: f64) -> Option<&Cue> {
        let candidate = self.cues.get(position)?;
        if ms_to_seconds(candidate.start_ms) > t {
            return None;
        }
        let best = self.cues[position + 1..]
            .iter()
            .take_while(|cue| cue.start_ms == candidate.start_ms)
            .filter(|cue| ms_to_seconds(cue.end_ms) >= t)
            .fold(candidate, |best, cue| if cue.index < best.index { cue } else { best });
        Some(best)
    }

    fn walk_forward(&self, from: usize, t: f64, stats: &mut LookupStats) -> usize {
        let mut position = from;
        for _ in 0..=self.scan_limit {
            if position >= self.max_end_ms.len() {
                stats.cursor_hits += 1;
                return position;
            }
            stats.probes += 1;
            if ms_to_seconds(self.max_end_ms[position]) >= t {
                stats.cursor_hits += 1;
                return position;
            }
            position += 1;
        }
        self.search_from(position, t, stats)
    }

    fn search_from(&self, from: usize, t: f64, stats: &mut LookupStats) -> usize {
        stats.binary_searches += 1;
        let mut probes = 0u64;
        let offset = self.max_end_ms[from..].partition_point(|&end_ms| {
            probes += 1;
            ms_to_seconds(end_ms) < t
        });
        stats.probes += probes;
        from + offset
    }
}
