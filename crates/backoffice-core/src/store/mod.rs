// ── Resource stores ──
//
// One store per collection: the authoritative local copy of the server
// records, published through a `watch` channel.

mod resource_store;
mod state;

pub use resource_store::ResourceStore;
pub use state::{CollectionState, LoadStatus};
