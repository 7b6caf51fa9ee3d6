pub mod convert;
pub mod mapping;
pub mod row;
pub mod value;

pub use convert::{CoercionError, ColumnValue, DeclaredType, StoreType};
pub use mapping::{ColumnMapping, Hydration, RelationMapping, TypeMapping};
pub use row::Row;
pub use value::Value;
