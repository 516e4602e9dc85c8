//! Primitive wire codec, read cursor, and coercion table

pub mod convert;
pub mod cursor;
pub mod primitives;

pub use convert::{can_coerce, coerce, coercion_pairs};
pub use cursor::ByteCursor;
pub use primitives::{
    decode_primitive, decode_string, encode_length, encode_primitive, encode_string,
    skip_primitive,
};
