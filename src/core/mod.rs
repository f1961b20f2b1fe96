//! Row transformation pipeline: column resolution, query decoding, item
//! aggregation and table assembly

pub mod assembler;
pub mod column;
pub mod items;
pub mod query;
pub mod transformer;

pub use column::{column_index_to_letter, column_letter_to_index, parse_column_letter};
pub use query::decode_query;
pub use transformer::{process_rows, ProcessOutput, RowTransformer};
