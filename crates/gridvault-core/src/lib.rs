pub mod cell;
pub mod error;
pub mod memory;
pub mod name;
pub mod registry;
pub mod service;
pub mod store;
pub mod table;

pub use cell::CellEntry;
pub use error::{SheetError, StoreError};
pub use memory::MemorySheetStore;
pub use name::{SheetName, DEFAULT_SHEET_NAME};
pub use registry::{RegistryRecord, REGISTRY_KEY};
pub use service::SheetService;
pub use store::{SheetRemoval, SheetStore};
pub use table::{TableSnapshot, DEFAULT_GRID_SIZE};
