pub mod change;
pub mod sync;
pub mod controller;

pub use change::*;
pub use sync::*;
pub use controller::*;
