pub mod catalog_store;
pub use catalog_store::CatalogStore;

pub mod sync;
pub use sync::{CatalogSource, ShowSynchronizer, SyncError, SyncReport};

pub mod scheduler;
pub use scheduler::Scheduler;

pub mod show_service;
pub mod show_service_impl;
pub use show_service::{ShowError, ShowService};
pub use show_service_impl::SeaOrmShowService;
