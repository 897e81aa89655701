//! Seed contexts for the rolls made while resolving one attack.
//!
//! Values only need to be distinct within a single action.

pub const HIT: u32 = 0x10;
pub const DAMAGE: u32 = 0x11;
pub const BLEED_SPREAD: u32 = 0x12;
pub const BLEED_DIRECTION: u32 = 0x13;
/// On-hit effect `i` uses `ON_HIT + i`.
pub const ON_HIT: u32 = 0x20;
