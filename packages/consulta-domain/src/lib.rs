pub mod candidate;
pub mod citation;
pub mod context;
pub mod fusion;
pub mod message;

pub use candidate::{Candidate, FusedResult, Origin};
pub use citation::Citation;
pub use context::{Assembled, ContextBlock, TRUNCATION_MARKER};
pub use fusion::FusionParams;
pub use message::{Message, Role};
