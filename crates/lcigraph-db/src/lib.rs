//! lcigraph-db: the life-cycle inventory graph
//!
//! Activities (process records) linked by exchanges of physical flows:
//! - **Model**: `Activity`, `Exchange`, identity keys
//! - **Database**: ordered activity store with a (name, product) index
//! - **Query**: composable filters over names, products and locations
//! - **Copy**: relocation of a template into a new region
//! - **Relink**: resolution of technosphere exchanges to concrete suppliers
//! - **Geomap**: ecoinvent location <-> IAM region mapping
//! - **Audit**: append-only CSV run logs
//!
//! Every generation pass reads templates from an immutable "original"
//! database and writes into a separate "working" database.

pub mod audit;
pub mod copy;
pub mod database;
pub mod geomap;
pub mod model;
pub mod query;
pub mod relink;

pub use audit::{log_file_name, AuditLog};
pub use copy::copy_to_new_location;
pub use database::Database;
pub use geomap::{Geomap, StaticGeomap};
pub use model::{
    Activity, ActivityKey, Exchange, ExchangeInput, ExchangeKind, Uncertainty, PROP_FOSSIL_CO2,
    PROP_LHV, PROP_LHV_DRY, PROP_MOISTURE, PROP_NON_FOSSIL_CO2,
};
pub use query::{Field, Fields, Filter};
pub use relink::{LocationCascadeRelinker, Relinker};

/// Errors raised by the database layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("no activity matches {query}")]
    NoResults { query: String },
    #[error("{count} activities match {query}, expected one")]
    MultipleResults { query: String, count: usize },
    #[error(
        "cannot resolve supplier '{name}' ({product}) for '{activity}' in '{location}': no candidate"
    )]
    Unresolved {
        activity: String,
        location: String,
        name: String,
        product: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;
