pub mod ela;
pub mod phash;

pub use ela::{ElaGenerator, ElaMap, compare_ela, generate_ela};
pub use phash::{HashOutcome, PerceptualHash, compare_hash};
