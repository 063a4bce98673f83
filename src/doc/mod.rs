//! Document loading infrastructure.

mod interface;
mod outline;
mod page;
mod session;

pub use interface::{
    AccessFault, DocumentHandle, DocumentLoad, DocumentService, LoadProgress, PageHandle,
    RenderSpec,
};
pub use outline::{DestinationResolver, OutlineNode, OutlineSession, OutlineTarget};
pub use page::PageSession;
pub use session::{DocumentSession, LoadPhase};
