//! `rds-data-codec` converts values to and from the tagged wire format of the
//! Aurora Data API, where every parameter and field is a single-key variant such as
//! `{"longValue": 42}`.
//!
//! The crate performs no I/O:
//! - [`Codec::format_parameters`] turns native values into wire parameters
//! - [`Codec::format_response`] turns a raw result payload into native records

mod codec;
mod decode;
mod encode;
mod error;
mod options;
mod params;
mod timestamp;
mod types;
mod value;
mod wire;

pub use codec::Codec;
pub use error::CodecError;
pub use options::{CodecOptions, Engine, FormatOptions, QueryOptions};
pub use params::Params;
pub use timestamp::{format_timestamp, parse_timestamp};
pub use types::{Record, Response, UpdateResult};
pub use value::Value;
pub use wire::{
    ArrayValue, ColumnMeta, Parameter, ParameterList, RawField, RawResult, RawUpdateResult, Tag,
    TaggedValue, TypeHint,
};

pub type Result<T> = std::result::Result<T, CodecError>;
