use serde::Deserialize;

/// SQL dialect of the target cluster.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Mysql,
    Pg,
}

impl Engine {
    /// Renders the placeholder for a parameter that carries an explicit `cast`.
    ///
    /// ```
    /// use rds_data_codec::Engine;
    ///
    /// assert_eq!(Engine::Pg.cast_placeholder("id", "uuid"), ":id::uuid");
    /// assert_eq!(Engine::Mysql.cast_placeholder("id", "CHAR"), "CAST(:id AS CHAR)");
    /// ```
    pub fn cast_placeholder(self, name: &str, cast: &str) -> String {
        match self {
            Self::Pg => format!(":{name}::{cast}"),
            Self::Mysql => format!("CAST(:{name} AS {cast})"),
        }
    }
}

/// Controls how timestamps are written and read back.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatOptions {
    /// Convert `DATE`/`DATETIME`/`TIMESTAMP` columns into [`crate::Value::Timestamp`].
    pub deserialize_date: bool,
    /// Use local calendar fields instead of UTC when formatting and parsing.
    pub treat_as_local_date: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            deserialize_date: true,
            treat_as_local_date: false,
        }
    }
}

/// Configures a [`crate::Codec`] instance.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodecOptions {
    /// Engine dialect of the target cluster.
    ///
    /// Only selects the placeholder rendered by [`Engine::cast_placeholder`]; parameter and
    /// response formatting are the same for both dialects.
    pub engine: Engine,
    /// Emit column-keyed records instead of positional ones.
    pub hydrate_column_names: bool,
    /// Timestamp handling.
    pub format_options: FormatOptions,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            engine: Engine::Mysql,
            hydrate_column_names: true,
            format_options: FormatOptions::default(),
        }
    }
}

/// Per-call overrides for response formatting.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct QueryOptions {
    /// Overrides [`CodecOptions::hydrate_column_names`] for one call.
    pub hydrate_column_names: Option<bool>,
    /// Copy `columnMetadata` into the response.
    pub include_result_metadata: bool,
}

impl QueryOptions {
    pub(crate) fn hydrate(&self, defaults: &CodecOptions) -> bool {
        self.hydrate_column_names
            .unwrap_or(defaults.hydrate_column_names)
    }

    /// Whether the transport has to ask the remote side for column metadata.
    ///
    /// Hydration needs labels even when the metadata itself is not returned.
    pub fn wants_result_metadata(&self, defaults: &CodecOptions) -> bool {
        self.include_result_metadata || self.hydrate(defaults)
    }
}
