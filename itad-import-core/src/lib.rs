//! Domain types and pure pipeline steps for importing a storefront order
//! export into an IsThereAnyDeal collection.
//!
//! Nothing in this crate touches the network or the disk: the order parser,
//! the selection curator and the wizard session are plain state transitions
//! over in-memory lists. The remote side lives in `itad-import-client`.

pub mod curator;
pub mod error;
pub mod parser;
pub mod record;
pub mod session;

pub use curator::Selection;
pub use error::{ImportError, SessionError};
pub use parser::{load_purchases, parse_orders};
pub use record::{CommitOutcome, LookupMethod, Price, PurchaseRecord, ResolvedMatch, SyncOutcome};
pub use session::{ImportSession, Ticket, WizardStep};
