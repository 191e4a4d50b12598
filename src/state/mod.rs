//! Form engine state module

mod consent;
mod forms;
mod gate;
mod registration;
mod validation;
mod verification;
mod view;

pub use consent::*;
pub use forms::*;
pub use gate::*;
pub use registration::*;
pub use validation::*;
pub use verification::*;
pub use view::*;
