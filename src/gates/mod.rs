//! Safety Gates
//!
//! Pure validators with no state: the Forge Gate vets candidate skill
//! sources before they are persisted, the Shell Gate vets raw commands
//! before they are spawned. Both are deliberate denylists -- acknowledged
//! incomplete trust boundaries, not sandboxes.

pub mod forge;
pub mod shell;
