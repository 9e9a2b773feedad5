//! # Action flows for skillchain
//!
//! The two things an instructor does here: mint an NFT badge to a student
//! and send SkillToken amounts. Each is a small form (two text fields and a
//! busy flag) whose `submit` validates input, invokes the fixed contract
//! method through the wallet adapter, and surfaces the outcome as a
//! transient notification on the session.
//!
//! Validation gates run in order and short-circuit before any network call:
//! connected session, non-empty fields, and (for token sends) a positive
//! finite amount. There is no optimistic state, no retry, and no idempotency
//! token; a failed submission is resubmitted by the user or not at all.

mod contracts;
mod error;
mod mint;
mod send;

pub use contracts::{BADGE_REGISTRY, MINT_BADGE, SKILL_TOKEN, TRANSFER};
pub use error::ActionError;
pub use mint::MintBadgeForm;
pub use send::SendTokensForm;
