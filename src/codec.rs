use crate::{
    decode::assemble_response,
    encode::format_parameter,
    params::{extract, normalize, Shape},
    CodecOptions, FormatOptions, Parameter, ParameterList, Params, QueryOptions, RawResult,
    Response, Result, Value,
};

/// Converts parameters into Data API wire shape and Data API results back into native values.
///
/// A codec holds only its options, so one instance can be shared freely between callers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Codec {
    options: CodecOptions,
}

impl Codec {
    /// Creates a codec with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies codec options such as engine dialect and hydration.
    pub fn with_options(mut self, opts: CodecOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Formats statement parameters.
    ///
    /// An array of arrays yields [`ParameterList::Batch`], one set per inner array.
    /// Everything else yields [`ParameterList::Single`].
    ///
    /// ```
    /// use rds_data_codec::{Codec, ParameterList, Params, Value};
    ///
    /// let codec = Codec::new();
    /// let params = codec
    ///     .format_parameters(Params::named([("id", Value::from(5)), ("ratio", Value::from(0.5))]))
    ///     .expect("must format");
    ///
    /// let ParameterList::Single(params) = params else { unreachable!() };
    /// assert_eq!(params.len(), 2);
    /// ```
    pub fn format_parameters<P: Into<Params>>(&self, params: P) -> Result<ParameterList> {
        let format_options = &self.options.format_options;
        match extract(params.into())? {
            Shape::Empty => Ok(ParameterList::default()),
            Shape::Single(members) => {
                format_set(members, format_options).map(ParameterList::Single)
            }
            Shape::Batch(sets) => sets
                .into_iter()
                .map(|members| format_set(members, format_options))
                .collect::<Result<Vec<_>>>()
                .map(ParameterList::Batch),
        }
    }

    /// Formats a raw result using the codec's defaults.
    pub fn format_response(&self, raw: RawResult) -> Response {
        self.format_response_with(raw, QueryOptions::default())
    }

    /// Formats a raw result with per-call overrides.
    pub fn format_response_with(&self, raw: RawResult, query: QueryOptions) -> Response {
        assemble_response(raw, &self.options, &query)
    }
}

fn format_set(members: Vec<Value>, options: &FormatOptions) -> Result<Vec<Parameter>> {
    normalize(members)?
        .into_iter()
        .map(|named| format_parameter(named.name, &named.value, named.cast, options))
        .collect()
}
