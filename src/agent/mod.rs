//! Learning agent - feature extraction, Q-estimation, policy, reward
//! accounting, weight updates, and the episode phase machine

pub mod features;
pub mod learner;
pub mod phase;
pub mod policy;
pub mod report;
pub mod reward;
pub mod roster;
pub mod update;
pub mod weights;

pub use features::{feature_vector, FeatureVector, BIAS, NUM_FEATURES};
pub use learner::{is_significant, Learner};
pub use phase::{BlockSummary, EpisodeOutcome, Phase, PhaseState};
pub use policy::select_target;
pub use reward::{turn_reward, RewardLedger};
pub use roster::Roster;
pub use update::update_weights;
pub use weights::Weights;
