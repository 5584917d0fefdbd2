use std::cmp::Ordering;

/// One enumerable unit of time on the archive site: a year of tournament
/// results, or a ranking week. Produced once per run by the period
/// enumerator and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    /// Token as it appears in the source listing, e.g. `2017` or `2017-08-28`.
    pub token: String,
    /// Fully addressed listing page for this period.
    pub listing_url: String,
}

/// Inclusive bounds on period tokens. An absent bound is unbounded on that
/// side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodBounds {
    pub start: Option<String>,
    pub stop: Option<String>,
}

impl PeriodBounds {
    pub fn new(start: Option<String>, stop: Option<String>) -> Self {
        Self { start, stop }
    }

    /// Inclusive containment check: `start <= token <= stop` on set sides.
    pub fn contains(&self, token: &str) -> bool {
        if let Some(start) = self.start.as_deref() {
            if cmp_tokens(token, start) == Ordering::Less {
                return false;
            }
        }
        if let Some(stop) = self.stop.as_deref() {
            if cmp_tokens(token, stop) == Ordering::Greater {
                return false;
            }
        }
        true
    }
}

/// Numeric comparison when both tokens parse as integers (year tokens),
/// lexical otherwise. ISO date week tokens (`YYYY-MM-DD`) order correctly
/// under the lexical branch.
fn cmp_tokens(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

/// Verdict of [`PeriodFilter::check`] for a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodDecision {
    /// Token is in bounds and under the limit; yield it.
    Accept,
    /// Token is out of bounds; skip it without counting toward the limit.
    Skip,
    /// Accept limit reached; enumeration is over.
    Stop,
}

/// Stateful accept policy applied by the period enumerator, in source
/// document order. Two independent controls: inclusive token bounds and a
/// count limit (0 or absent means unlimited). Skipped tokens do not count
/// toward the limit.
#[derive(Debug, Clone)]
pub struct PeriodFilter {
    bounds: PeriodBounds,
    limit: Option<u32>,
    accepted: u32,
}

impl PeriodFilter {
    pub fn new(bounds: PeriodBounds, limit: Option<u32>) -> Self {
        // A limit of zero means unlimited, per the configuration surface.
        let limit = limit.filter(|n| *n > 0);
        Self {
            bounds,
            limit,
            accepted: 0,
        }
    }

    pub fn unlimited(bounds: PeriodBounds) -> Self {
        Self::new(bounds, None)
    }

    pub fn check(&mut self, token: &str) -> PeriodDecision {
        if let Some(limit) = self.limit {
            if self.accepted >= limit {
                return PeriodDecision::Stop;
            }
        }
        if !self.bounds.contains(token) {
            return PeriodDecision::Skip;
        }
        self.accepted += 1;
        PeriodDecision::Accept
    }

    /// Number of tokens accepted so far.
    pub fn accepted(&self) -> u32 {
        self.accepted
    }
}
