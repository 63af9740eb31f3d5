//! Capacity ladder and table layouts.

/// Bucket counts a resizable table may take, smallest first. Primes, each
/// roughly double the previous.
pub const CAPACITY_LADDER: [usize; 8] = [509, 1021, 2039, 4093, 8191, 16381, 32749, 65521];

/// Bucket arrangement chosen at construction.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Layout {
    /// Starts at the first rung and grows along `CAPACITY_LADDER`.
    #[default]
    Resizable,
    /// Stays at the first rung forever.
    Fixed,
    /// A single bucket that never grows: a plain linked list.
    List,
}

impl Layout {
    /// Bucket count a new table starts with.
    pub const fn initial_capacity(self) -> usize {
        match self {
            Layout::Resizable | Layout::Fixed => CAPACITY_LADDER[0],
            Layout::List => 1,
        }
    }

    /// Bucket count to grow to once `len` bindings sit in `capacity` buckets,
    /// or `None` if the table should stay put.
    ///
    /// Growth is due when the count reaches the capacity. A table whose last
    /// growth attempt was abandoned sits above its capacity and is due again.
    pub fn next_capacity(self, len: usize, capacity: usize) -> Option<usize> {
        if self != Layout::Resizable || len < capacity {
            return None;
        }
        CAPACITY_LADDER.iter().copied().find(|&c| c > capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: the ladder strictly ascends.
    #[test]
    fn ladder_ascends() {
        assert!(CAPACITY_LADDER.windows(2).all(|w| w[0] < w[1]));
    }

    /// Invariant: growth triggers once the count reaches the capacity, and
    /// moves exactly one rung.
    #[test]
    fn grows_one_rung_when_full() {
        let l = Layout::Resizable;
        assert_eq!(l.next_capacity(0, 509), None);
        assert_eq!(l.next_capacity(508, 509), None);
        assert_eq!(l.next_capacity(509, 509), Some(1021));
        assert_eq!(l.next_capacity(1021, 1021), Some(2039));
        assert_eq!(l.next_capacity(32749, 32749), Some(65521));
    }

    /// Invariant: a table left above its capacity by an abandoned growth is
    /// due again, still by a single rung.
    #[test]
    fn overdue_growth_retries_one_rung() {
        assert_eq!(Layout::Resizable.next_capacity(510, 509), Some(1021));
        assert_eq!(Layout::Resizable.next_capacity(5000, 1021), Some(2039));
    }

    /// Invariant: the top rung never grows.
    #[test]
    fn top_rung_is_final() {
        assert_eq!(Layout::Resizable.next_capacity(65521, 65521), None);
        assert_eq!(Layout::Resizable.next_capacity(1 << 20, 65521), None);
    }

    /// Invariant: fixed layouts never grow.
    #[test]
    fn fixed_layouts_never_grow() {
        assert_eq!(Layout::Fixed.next_capacity(509, 509), None);
        assert_eq!(Layout::List.next_capacity(1, 1), None);
        assert_eq!(Layout::List.initial_capacity(), 1);
        assert_eq!(Layout::Fixed.initial_capacity(), 509);
        assert_eq!(Layout::default(), Layout::Resizable);
    }
}
