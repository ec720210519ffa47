pub mod bindings;
pub mod pipeline;
pub mod plan;
pub mod report;

pub use bindings::*;
pub use pipeline::*;
pub use plan::*;
pub use report::*;
