//! Record a state per item for each labeled version, undo the last change,
//! and export the item × version matrix to CSV.

pub mod csv_io;
pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod session;
pub mod store;
pub mod summary;

pub use error::{Error, Precondition, Result, ValidationError};
pub use model::{Descriptions, ItemSet, StatesMap};
pub use store::StateStore;
