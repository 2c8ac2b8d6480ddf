pub mod read_products;

pub use read_products::{ReadProductsError, ReadProductsQuery};
