/// Pacing and reward parameters for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierParams {
    pub spawn_interval_secs: f64,
    /// Logical playfield units per second
    pub fall_speed: f64,
    pub score_per_word: u32,
}

pub const MIN_TIER: u8 = 1;
pub const MAX_TIER: u8 = 3;

// Harder tiers spawn faster, fall faster and pay more.
const TIERS: [TierParams; 3] = [
    TierParams {
        spawn_interval_secs: 1.6,
        fall_speed: 80.0,
        score_per_word: 10,
    },
    TierParams {
        spawn_interval_secs: 1.2,
        fall_speed: 110.0,
        score_per_word: 14,
    },
    TierParams {
        spawn_interval_secs: 0.9,
        fall_speed: 145.0,
        score_per_word: 18,
    },
];

/// Static tier lookup table
pub struct DifficultyTable;

impl DifficultyTable {
    /// Parameters for `tier`; anything outside 1..=3 gets tier 1.
    pub fn lookup(tier: u8) -> TierParams {
        if (MIN_TIER..=MAX_TIER).contains(&tier) {
            TIERS[(tier - MIN_TIER) as usize]
        } else {
            TIERS[0]
        }
    }

    pub fn clamp_tier(tier: u8) -> u8 {
        if (MIN_TIER..=MAX_TIER).contains(&tier) {
            tier
        } else {
            MIN_TIER
        }
    }
}
