// Plant Toxins - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod config;
pub mod db;
pub mod detail;
pub mod entities;
pub mod error;
pub mod import;
pub mod listing;
pub mod params;
pub mod severity;
pub mod verify;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::Config;
pub use db::{open_database, open_in_memory, setup_database, table_counts};
pub use detail::{plant_detail, PlantDetail};
pub use entities::{
    Plant, PlantSymptom, PlantToxin, PlantTreatment, Source, Symptom, SymptomPlant, Toxin,
    ToxinPlant,
};
pub use error::{ApiError, ApiResult};
pub use import::{import_path, import_records, ImportSummary, PlantRecord};
pub use listing::{search_plants, ListParams, ListQuery, PlantPage, PlantSummary};
pub use severity::Severity;
pub use verify::{verify_database, VerifyReport};

/// Library version, reported by the health endpoint
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
