// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — Table Bundle
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Process-wide, read-only bundle of physical tables.
//!
//! A bundle is loaded once from a data directory described by a
//! [`DataConfig`] manifest and shared behind an [`Arc`]. The global bundle
//! is initialised lazily from `$ATMOFLUX_DATA` (or `./data`) on first use,
//! or explicitly with [`Tables::install`].

use crate::cutoff::CutoffMap;
use crate::lines::SpectralLineTable;
use crate::solar::SolarSeries;
use crate::spectrum::{AngularTable, GeometryCorrection, SpectrumGrid};
use atmoflux_types::config::DataConfig;
use atmoflux_types::error::{FluxError, FluxResult};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

static GLOBAL: OnceCell<Arc<Tables>> = OnceCell::new();

/// All tables one flux evaluation needs.
#[derive(Debug, Clone)]
pub struct Tables {
    name: String,
    spectra: SpectrumGrid,
    cutoff: CutoffMap,
    solar: SolarSeries,
    lines: SpectralLineTable,
    angular: Option<AngularTable>,
    geometry: Option<GeometryCorrection>,
}

impl Tables {
    /// Bundle with the required tables; lines, angular and geometry data
    /// start out empty.
    pub fn new(spectra: SpectrumGrid, cutoff: CutoffMap, solar: SolarSeries) -> Self {
        Tables {
            name: String::new(),
            spectra,
            cutoff,
            solar,
            lines: SpectralLineTable::default(),
            angular: None,
            geometry: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_lines(mut self, lines: SpectralLineTable) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_angular(mut self, angular: AngularTable) -> Self {
        self.angular = Some(angular);
        self
    }

    pub fn with_geometry(mut self, geometry: GeometryCorrection) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Load every table named by a manifest.
    pub fn load(config: &DataConfig) -> FluxResult<Self> {
        let npz = config.spectra_npz.as_deref().map(|f| config.resolve(f));
        let spectra = SpectrumGrid::load(config.resolve(&config.spectra), npz.as_deref())?;
        let cutoff = CutoffMap::load(config.resolve(&config.cutoff))?;
        let solar = SolarSeries::load(config.resolve(&config.solar))?;

        let mut tables = Tables::new(spectra, cutoff, solar).with_name(config.name.clone());
        if let Some(file) = &config.lines {
            tables = tables.with_lines(SpectralLineTable::load(config.resolve(file))?);
        }
        if let Some(file) = &config.angular {
            tables = tables.with_angular(AngularTable::load(config.resolve(file))?);
        }
        if let Some(file) = &config.geometry {
            tables = tables.with_geometry(GeometryCorrection::load(config.resolve(file))?);
        }

        info!(
            data = %config.root.display(),
            name = %tables.name,
            species = tables.spectra.species().len(),
            lines = tables.lines.len(),
            angular = tables.angular.is_some(),
            geometry = tables.geometry.is_some(),
            "loaded flux tables"
        );
        Ok(tables)
    }

    /// Load the manifest and tables of a data directory.
    pub fn load_dir(dir: impl AsRef<Path>) -> FluxResult<Self> {
        Self::load(&DataConfig::from_dir(dir)?)
    }

    /// Process-wide bundle, loaded from [`DataConfig::data_dir`] on first use.
    pub fn global() -> FluxResult<&'static Arc<Tables>> {
        GLOBAL.get_or_try_init(|| Self::load_dir(DataConfig::data_dir()).map(Arc::new))
    }

    /// Install the process-wide bundle. Fails once one is in place.
    pub fn install(tables: Arc<Tables>) -> FluxResult<()> {
        GLOBAL.set(tables).map_err(|_| {
            FluxError::ConfigError("process-wide tables are already initialised".to_string())
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spectra(&self) -> &SpectrumGrid {
        &self.spectra
    }

    pub fn cutoff(&self) -> &CutoffMap {
        &self.cutoff
    }

    pub fn solar(&self) -> &SolarSeries {
        &self.solar
    }

    pub fn lines(&self) -> &SpectralLineTable {
        &self.lines
    }

    pub fn angular(&self) -> Option<&AngularTable> {
        self.angular.as_ref()
    }

    pub fn geometry(&self) -> Option<&GeometryCorrection> {
        self.geometry.as_ref()
    }
}
