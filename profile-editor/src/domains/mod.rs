//! Editor domains
//!
//! Only the profile domain exists today; it owns everything the profile
//! screen shows and does.

pub mod profile;
