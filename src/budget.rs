//! Token budgeter: char-based token estimation plus the greedy prefix-packing
//! primitive both the relevance selector and the content packer are built on.

// ── Token estimator ────────────────────────────────────────────────────────────

const TOKENS_PER_CHAR: f32 = 0.28; // calibrated on cl100k_base across mixed Rust/TS/Python (~3.57 chars/token avg)

/// Estimate the token cost of a text. Heuristic, intentionally pessimistic
/// enough that a packed prompt stays inside the provider's real limit.
pub fn estimate_tokens(text: &str) -> usize {
    (text.len() as f32 * TOKENS_PER_CHAR).ceil() as usize
}

// ── Budget ─────────────────────────────────────────────────────────────────────

/// Input capacity of the target model, in estimated tokens.
#[derive(Debug, Clone, Copy)]
pub struct TokenBudget {
    capacity: usize,
}

impl TokenBudget {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Room left after a fixed per-call overhead. `None` when the overhead
    /// alone fills (or exceeds) the capacity — callers turn that into
    /// `CoreError::BudgetExceeded` rather than packing into nothing.
    pub fn room_after(&self, overhead: usize) -> Option<usize> {
        match self.capacity.saturating_sub(overhead) {
            0 => None,
            room => Some(room),
        }
    }
}

// ── Greedy prefix packing ──────────────────────────────────────────────────────

/// Split `items` into the longest prefix whose cumulative cost stays within
/// `room`, and the untouched suffix. Strict greedy prefix: the scan stops at
/// the first item that would overflow; later items are never reconsidered.
///
/// Invariants: `selected ++ remaining == items` in original order, and
/// `sum(cost(selected)) <= room`. When even the first item does not fit the
/// selected half is empty and `remaining` is the full input — callers must
/// treat that zero-progress case as an explicit failure, never retry it.
pub fn pack_prefix<T, F>(items: &[T], cost: F, room: usize) -> (&[T], &[T])
where
    F: Fn(&T) -> usize,
{
    let mut used = 0usize;
    let mut cut = 0usize;
    for item in items {
        let item_cost = cost(item);
        if used + item_cost > room {
            break;
        }
        used += item_cost;
        cut += 1;
    }
    items.split_at(cut)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_is_prefix_and_reconstructs_input() {
        let items = vec![3usize, 5, 2, 8, 1];
        let (selected, remaining) = pack_prefix(&items, |&c| c, 10);
        assert_eq!(selected, &[3, 5, 2]);
        assert_eq!(remaining, &[8, 1]);
        let rebuilt: Vec<usize> = selected.iter().chain(remaining).copied().collect();
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn test_cumulative_cost_within_room() {
        let items: Vec<usize> = vec![4, 4, 4, 4];
        let (selected, _) = pack_prefix(&items, |&c| c, 9);
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().sum::<usize>() <= 9);
    }

    #[test]
    fn test_stops_at_first_overflow_even_if_later_items_fit() {
        // 6 overflows at room=10 after 5; the trailing 1 would fit but a
        // strict prefix never skips ahead.
        let items = vec![5usize, 6, 1];
        let (selected, remaining) = pack_prefix(&items, |&c| c, 10);
        assert_eq!(selected, &[5]);
        assert_eq!(remaining, &[6, 1]);
    }

    #[test]
    fn test_first_item_too_big_selects_nothing() {
        let items = vec![100usize, 1];
        let (selected, remaining) = pack_prefix(&items, |&c| c, 10);
        assert!(selected.is_empty());
        assert_eq!(remaining, items.as_slice());
    }

    #[test]
    fn test_empty_input() {
        let items: Vec<usize> = vec![];
        let (selected, remaining) = pack_prefix(&items, |&c| c, 10);
        assert!(selected.is_empty());
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_room_after_overhead() {
        let budget = TokenBudget::new(100);
        assert_eq!(budget.room_after(30), Some(70));
        assert_eq!(budget.room_after(100), None);
        assert_eq!(budget.room_after(150), None);
    }

    #[test]
    fn test_estimate_tokens_scales_with_length() {
        let short = estimate_tokens("fn main() {}");
        let long = estimate_tokens(&"fn main() {}".repeat(50));
        assert!(long > short * 10);
        assert_eq!(estimate_tokens(""), 0);
    }
}
