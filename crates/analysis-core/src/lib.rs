pub mod benchmark;
pub mod calculator;
pub mod definition;
pub mod error;
pub mod evaluation;
pub mod i18n;
pub mod numeric;
pub mod result;
pub mod stats;
pub mod traits;
pub mod types;
pub mod validation;

pub use benchmark::*;
pub use calculator::*;
pub use definition::*;
pub use error::*;
pub use evaluation::*;
pub use result::*;
pub use traits::*;
pub use types::*;
pub use validation::*;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
