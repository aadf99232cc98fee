pub mod pile;
pub mod progression;

pub use pile::Pile;
pub use progression::Progression;
