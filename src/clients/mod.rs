pub mod catalog;
pub mod orders;

pub use catalog::CatalogClient;
pub use orders::OrderClient;
