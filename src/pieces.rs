//! Piece catalog: block shapes, colour tags, ids and the spawn bag.

use std::fmt;

/// Identifies one spawned piece for its whole life (active, placed, cleared).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Piece shapes. `Seed` is the grey anchor block and is never dealt by the bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Seed,
    Cube,
    Domino,
    Ell,
    Tee,
}

impl PieceKind {
    /// Playable kinds, in catalog order.
    pub const ALL: [Self; 4] = [Self::Cube, Self::Domino, Self::Ell, Self::Tee];

    /// Block offsets relative to the piece anchor.
    pub fn blocks(&self) -> &'static [[i32; 3]] {
        match self {
            Self::Seed | Self::Cube => &[[0, 0, 0]],
            Self::Domino => &[[0, 0, 0], [1, 0, 0]],
            Self::Ell => &[[0, 0, 0], [1, 0, 0], [1, 1, 0]],
            Self::Tee => &[[0, 0, 0], [1, 0, 0], [2, 0, 0], [1, 1, 0]],
        }
    }

    /// Display colour tag ("#RRGGBB").
    pub fn color(&self) -> &'static str {
        match self {
            Self::Seed => "#888888",
            Self::Cube => "#9B87F5",
            Self::Domino => "#F97316",
            Self::Ell => "#0EA5E9",
            Self::Tee => "#FEC6A1",
        }
    }

    /// Stable index for per-kind colour tables (Seed = 0).
    pub fn color_index(&self) -> usize {
        match self {
            Self::Seed => 0,
            Self::Cube => 1,
            Self::Domino => 2,
            Self::Ell => 3,
            Self::Tee => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::Cube => "cube",
            Self::Domino => "domino",
            Self::Ell => "L",
            Self::Tee => "T",
        }
    }
}

/// Bag of every playable kind (random order, then refill).
#[derive(Debug, Clone)]
pub struct Bag {
    queue: Vec<PieceKind>,
    rng: u32,
}

impl Bag {
    pub fn new(seed: u32) -> Self {
        let mut b = Self {
            queue: Vec::with_capacity(PieceKind::ALL.len() * 2),
            rng: seed,
        };
        b.refill();
        b
    }

    fn refill(&mut self) {
        let mut all = PieceKind::ALL.to_vec();
        // Fisher–Yates shuffle
        for i in (1..all.len()).rev() {
            let j = (self.next_rand() as usize) % (i + 1);
            all.swap(i, j);
        }
        self.queue.extend(all);
    }

    fn next_rand(&mut self) -> u32 {
        self.rng = self.rng.wrapping_mul(1_103_515_245).wrapping_add(12345);
        self.rng >> 16
    }

    pub fn next(&mut self) -> PieceKind {
        if self.queue.len() < 2 {
            self.refill();
        }
        self.queue.remove(0)
    }

    /// Upcoming kind without consuming it.
    pub fn peek(&self) -> Option<PieceKind> {
        self.queue.first().copied()
    }
}

impl Default for Bag {
    fn default() -> Self {
        Self::new(0x1234_5678)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_kind_has_anchor_block() {
        for kind in PieceKind::ALL {
            assert_eq!(kind.blocks()[0], [0, 0, 0], "{kind:?}");
        }
        assert_eq!(PieceKind::Seed.blocks().len(), 1);
    }

    #[test]
    fn test_colour_indices_distinct() {
        let mut seen = HashSet::new();
        assert!(seen.insert(PieceKind::Seed.color_index()));
        for kind in PieceKind::ALL {
            assert!(seen.insert(kind.color_index()));
            assert!(kind.color().starts_with('#'));
        }
    }

    #[test]
    fn test_bag_deals_each_kind_per_round() {
        let mut bag = Bag::new(42);
        let round: HashSet<_> = (0..PieceKind::ALL.len()).map(|_| bag.next()).collect();
        assert_eq!(round.len(), PieceKind::ALL.len());
        assert!(!round.contains(&PieceKind::Seed));
    }

    #[test]
    fn test_bag_peek_matches_next() {
        let mut bag = Bag::default();
        for _ in 0..10 {
            let peeked = bag.peek();
            assert_eq!(peeked, Some(bag.next()));
        }
    }

    #[test]
    fn test_bag_same_seed_same_sequence() {
        let mut a = Bag::new(7);
        let mut b = Bag::new(7);
        for _ in 0..12 {
            assert_eq!(a.next(), b.next());
        }
    }
}
