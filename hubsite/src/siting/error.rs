use thiserror::Error;

/// Errors raised by the siting pipeline.
///
/// Geometry and data-format problems local to one feature stay local
/// wherever the contract allows it: the merger and the enricher skip the
/// offending feature with a warning, while the strict area pass of the
/// parcel filter surfaces `DataFormat` for the whole batch.
#[derive(Debug, Error)]
pub enum SitingError {
    /// A required numeric attribute could not be coerced.
    #[error("field `{field}` is not numeric for parcel {parcel}: {value}")]
    DataFormat {
        field: String,
        parcel: String,
        value: String,
    },

    /// A GEOS conversion or operation failed.
    #[error("geometry operation failed: {0}")]
    Geometry(#[from] geos::Error),

    /// A feature carries GeoJSON geometry that cannot be interpreted.
    #[error("invalid feature geometry: {0}")]
    InvalidGeometry(#[from] geojson::Error),

    /// The pipeline was run before one of its inputs was provided.
    #[error("missing pipeline input: {0}")]
    MissingInput(&'static str),
}
