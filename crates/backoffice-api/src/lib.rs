// backoffice-api: Async REST client for the console's remote collections

pub mod collection;
pub mod error;
pub mod record;
pub mod transport;

pub use collection::CollectionClient;
pub use error::Error;
pub use record::{Record, RecordId};
pub use transport::{TlsMode, TransportConfig};
