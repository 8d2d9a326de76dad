//! Ports (trait boundaries) between the learning core and its consumers.

pub mod observer;
pub mod policy;

pub use observer::Observer;
pub use policy::Policy;
