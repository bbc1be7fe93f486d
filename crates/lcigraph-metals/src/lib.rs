//! lcigraph-metals: metal use of technology datasets
//!
//! Datasets mapped to a DLR technology variable get their metal resource
//! extraction set to the projected median intensity for the scenario year,
//! net of what the base inventory already embodies. Every touched exchange
//! carries an [`MetalStamp`] in its comment, from which the run-end report
//! is built.

pub mod report;
pub mod stamp;
pub mod updater;

pub use report::{modified_rows, REPORT_HEADER};
pub use stamp::MetalStamp;
pub use updater::update_metal_use;

use lcigraph_db::{log_file_name, AuditLog, Database, DbError};
use lcigraph_iam::{MetalIntensity, ScenarioConfig, MEDIAN};
use lcigraph_refdata::MetalsRefData;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MetalsError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MetalsError>;

/// Metal-use update of one scenario.
pub struct Metals {
    database: Database,
    intensity: MetalIntensity,
    refdata: MetalsRefData,
    config: ScenarioConfig,
}

impl Metals {
    pub fn new(
        database: Database,
        intensity: MetalIntensity,
        refdata: MetalsRefData,
        config: ScenarioConfig,
    ) -> Self {
        Self {
            database,
            intensity,
            refdata,
            config,
        }
    }

    /// Update every mapped dataset, then write the report. Returns the
    /// number of datasets updated and the report path.
    pub fn update_metals_use_in_database(&mut self) -> Result<(usize, PathBuf)> {
        let year = self.config.year;
        let mut updated = 0;

        for ds in self.database.iter_mut() {
            let Some(technology) = self.refdata.technologies.key_for(&ds.name) else {
                continue;
            };
            if !self.intensity.has_technology(technology) {
                tracing::warn!(technology = %technology, name = %ds.name, "technology not found in DLR data");
                continue;
            }
            let profile = self.intensity.profile(technology, MEDIAN, year);
            let touched = update_metal_use(ds, technology, &profile, &self.refdata);
            tracing::debug!(name = %ds.name, location = %ds.location, technology = %technology, touched, "metal use updated");
            updated += 1;
        }
        tracing::info!(updated, year, "integrated metal use factors");

        let path = self.write_report()?;
        Ok((updated, path))
    }

    fn write_report(&self) -> Result<PathBuf> {
        let name = log_file_name(
            "modified metals use",
            &self.config.model,
            &self.config.pathway,
            self.config.year,
        );
        let path = AuditLog::new(&self.config.log_dir).write_table(
            &name,
            &REPORT_HEADER,
            modified_rows(&self.database),
            ',',
        )?;
        tracing::info!(path = %path.display(), "metal use report written");
        Ok(path)
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn into_database(self) -> Database {
        self.database
    }
}
