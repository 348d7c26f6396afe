pub mod customer;
pub mod date_range;
pub mod ids;
pub mod macros;
pub mod order;
pub mod pagination;
pub mod product;

pub use customer::*;
pub use date_range::{parse_date, range_for, DateRange, RangePreset};
pub use ids::*;
pub use order::*;
pub use pagination::{PageRequest, Paged, SortDir};
pub use product::*;
