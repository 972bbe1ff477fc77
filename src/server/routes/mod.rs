//! Route handlers module.

pub mod dashboard;
pub mod health;
pub mod lucky_ip;
