//! Entity structs for the audit domain.
//!
//! All structs derive `Serialize`, `Deserialize` and `JsonSchema` so they can
//! cross the persistence boundary and be rendered by the CLI.

mod patch;
mod response;
mod section;

pub use patch::ResponsePatch;
pub use response::QuestionResponse;
pub use section::SectionNode;
