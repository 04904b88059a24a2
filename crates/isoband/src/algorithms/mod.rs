pub mod classification;
pub mod containment;
pub mod repair;
pub mod assembly;

pub use classification::*;
pub use containment::*;
pub use repair::*;
pub use assembly::*;
