pub mod document;
pub mod matcher;
pub mod numeric;
pub mod highlight;
pub mod redact;

pub use document::*;
pub use matcher::*;
pub use numeric::*;
pub use highlight::*;
pub use redact::*;

#[cfg(test)]
mod tests;
