use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Source of tie-break ordering for the planner.
///
/// Shuffling is what makes the generated options differ from one another,
/// so production requests use [`TieBreak::Entropy`]. Tests pin the order
/// with [`TieBreak::Seeded`] or switch it off with [`TieBreak::Fixed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    #[default]
    Entropy,
    /// Option `k` is shuffled with seed `seed + k`.
    Seeded(u64),
    /// Keep input and catalog order everywhere.
    Fixed,
}

impl TieBreak {
    pub fn shuffler_for(self, option: u8) -> Shuffler {
        let rng = match self {
            TieBreak::Entropy => Some(StdRng::from_os_rng()),
            TieBreak::Seeded(seed) => Some(StdRng::seed_from_u64(seed.wrapping_add(option.into()))),
            TieBreak::Fixed => None,
        };
        Shuffler { rng }
    }
}

/// Per-run shuffler. Never shared between option runs.
#[derive(Debug)]
pub struct Shuffler {
    rng: Option<StdRng>,
}

impl Shuffler {
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        if let Some(rng) = self.rng.as_mut() {
            items.shuffle(rng);
        }
    }
}
