#![forbid(unsafe_code)]

pub mod fixed;
pub mod signature;
pub mod threshold;

pub use fixed::FixedDecisionController;
pub use signature::{authorization_message, sign_authorization, Ed25519Controller};
pub use threshold::{ThresholdController, ThresholdProof};
