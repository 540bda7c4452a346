//! Checked-in seed fixture for cold-start bootstrap.
//!
//! When no persisted artifacts exist the bundle trains on these five
//! examples so the service can always produce a prediction, trading initial
//! accuracy for availability. The fixture is versioned data: changing it
//! changes the bootstrap decision boundary.

/// One seed example.
#[derive(Debug, Clone, Copy)]
pub struct SeedReview {
    pub text: &'static str,
    pub fake: bool,
    pub verified: bool,
    pub account_age_days: u32,
}

/// The bootstrap corpus.
pub const SEED_REVIEWS: [SeedReview; 5] = [
    SeedReview {
        text: "great product",
        fake: false,
        verified: true,
        account_age_days: 365,
    },
    SeedReview {
        text: "awful scam",
        fake: true,
        verified: false,
        account_age_days: 2,
    },
    SeedReview {
        text: "works as expected",
        fake: false,
        verified: true,
        account_age_days: 180,
    },
    SeedReview {
        text: "fake review buy now",
        fake: true,
        verified: false,
        account_age_days: 1,
    },
    SeedReview {
        text: "legit purchase",
        fake: false,
        verified: true,
        account_age_days: 730,
    },
];
