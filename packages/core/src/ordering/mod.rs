//! Order-Key Arithmetic
//!
//! Fractional ordering for sibling groups: inserting between two quests is a
//! midpoint computation over their keys instead of a rewrite of the whole
//! group. When the gap between two neighbors drops below [`MIN_GAP`] the
//! group must be re-keyed with [`OrderKeyCalculator::spaced_sequence`] before
//! a new key can be produced.

/// Spacing between keys handed out by [`OrderKeyCalculator::spaced_sequence`]
/// and [`OrderKeyCalculator::trailing_key`]. A spacing of 100 survives on the
/// order of tens of thousands of midpoint bisections before a group needs a
/// reindex.
pub const KEY_SPACING: f64 = 100.0;

/// Minimum usable gap between two neighboring keys. At or below this the
/// midpoint is considered exhausted and the caller must reindex.
pub const MIN_GAP: f64 = 1e-6;

/// Span assumed above the last key (or from zero) when a neighbor is absent.
const DEFAULT_SPAN: f64 = 2_000.0;

/// Calculates fractional order keys for inserting a node between two siblings
pub struct OrderKeyCalculator;

impl OrderKeyCalculator {
    /// Compute a key strictly between `prev` and `next`.
    ///
    /// Absent neighbors default to `prev = 0` and `next = prev + 2000`, so an
    /// empty group yields `1000`. Returns `None` when the gap is exhausted
    /// (`next - prev <= 1e-6`); the caller must reindex the group and retry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use questline_core::ordering::OrderKeyCalculator;
    ///
    /// // First node in an empty group
    /// assert_eq!(OrderKeyCalculator::midpoint(None, None), Some(1000.0));
    ///
    /// // Before the first node
    /// assert_eq!(OrderKeyCalculator::midpoint(None, Some(100.0)), Some(50.0));
    ///
    /// // Between two nodes
    /// assert_eq!(OrderKeyCalculator::midpoint(Some(100.0), Some(200.0)), Some(150.0));
    ///
    /// // Gap exhausted
    /// assert_eq!(OrderKeyCalculator::midpoint(Some(100.0), Some(100.0000001)), None);
    /// ```
    pub fn midpoint(prev: Option<f64>, next: Option<f64>) -> Option<f64> {
        let lo = prev.unwrap_or(0.0);
        let hi = next.unwrap_or(lo + DEFAULT_SPAN);
        if hi - lo <= MIN_GAP {
            return None;
        }
        Some((lo + hi) / 2.0)
    }

    /// Evenly spaced keys for `count` ordered items: `100, 200, 300, ...`
    ///
    /// This is the canonical dense re-key applied to a sibling group after
    /// midpoint exhaustion; applying it to an already ordered group preserves
    /// the relative order.
    pub fn spaced_sequence(count: usize) -> Vec<f64> {
        (1..=count).map(|i| i as f64 * KEY_SPACING).collect()
    }

    /// Key for appending after the current last sibling (or starting a group)
    pub fn trailing_key(last: Option<f64>) -> f64 {
        last.map_or(KEY_SPACING, |key| key + KEY_SPACING)
    }

    /// Coerce a stored key value to a finite number, else `fallback`.
    ///
    /// The remote store is duck-typed; keys arrive as numbers, numeric
    /// strings, or garbage. Coercion never fails - a row with an unusable key
    /// sorts at `fallback` until the next reindex repairs it.
    pub fn coerce_key(raw: &serde_json::Value, fallback: f64) -> f64 {
        let parsed = match raw {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|v| v.is_finite()).unwrap_or(fallback)
    }
}
