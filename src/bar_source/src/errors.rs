use snafu::Snafu;

/// Errors raised while listing, opening, or normalizing raw bar objects.
///
/// All of these are local to one object: the pipeline logs them and moves on
/// to the next file.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SourceError {
    /// The requested object does not exist in the store.
    #[snafu(display("Object not found: {path}"))]
    NotFound { path: String },

    /// Generic I/O failure while talking to the store.
    #[snafu(display("I/O error on {path}: {source}"))]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The listing pattern is not supported by this store.
    #[snafu(display("Unsupported listing pattern: {pattern}"))]
    InvalidPattern { pattern: String },

    /// The object bytes are not valid CSV.
    #[snafu(display("Malformed CSV: {source}"))]
    Csv { source: csv::Error },

    /// One or more required columns are absent after header normalization.
    #[snafu(display("Missing expected columns: {}", missing.join(", ")))]
    MissingColumns { missing: Vec<String> },
}
