//! The two pre-deployed collaborators on Polygon Mumbai. Both contracts are
//! owned and versioned outside this repository; only the single method each
//! form calls is described here.

use alloy_primitives::{address, Address};

/// Badge registry (ERC-721) deployment.
pub const BADGE_REGISTRY: Address = address!("0x1234567890123456789012345678901234567890");

/// SkillToken (ERC-20) deployment.
pub const SKILL_TOKEN: Address = address!("0x0987654321098765432109876543210987654321");

/// The badge registry fragment the mint form calls.
pub const MINT_BADGE: &str = "mintBadge(address,string)";

/// The token fragment the send form calls.
pub const TRANSFER: &str = "transfer(address,uint256)";
