//! End-to-end panel pipeline.

use crate::error::Result;
use bite_data::{
    AreaBoundaryProvider, BiteConfig, HttpFetcher, RawDataProvider, SqliteCache, SqliteRawStore,
    TigerCountyShapes, TigerZoneShapes, ZoneBoundaryProvider, ZoneGeometryCache,
};
use bite_panel::{IndustrySelector, PanelBuilder, PanelConfig, QuarterlyAreaPanel};
use bite_spatial::{ReferenceZoneSet, ZoneAreaMapper, ZoneAreaMapping};
use polars::prelude::DataFrame;
use std::rc::Rc;
use std::time::Duration;

/// Pipeline wired to the local database and the TIGER/Line downloads.
pub type DefaultPipeline =
    Pipeline<SqliteRawStore, TigerZoneShapes<HttpFetcher>, TigerCountyShapes<HttpFetcher>>;

/// Raw records in, quarterly area panels out.
#[derive(Debug)]
pub struct Pipeline<R, Z, A> {
    builder: PanelBuilder<R>,
    mapper: ZoneAreaMapper<Z, A>,
}

impl<R, Z, A> Pipeline<R, Z, A>
where
    R: RawDataProvider,
    Z: ZoneBoundaryProvider,
    A: AreaBoundaryProvider,
{
    /// Compose a pipeline from its parts.
    pub const fn new(builder: PanelBuilder<R>, mapper: ZoneAreaMapper<Z, A>) -> Self {
        Self { builder, mapper }
    }

    /// The panel builder.
    pub const fn builder(&self) -> &PanelBuilder<R> {
        &self.builder
    }

    /// The zone-area mapper.
    pub const fn mapper(&self) -> &ZoneAreaMapper<Z, A> {
        &self.mapper
    }

    /// Cleaned establishment-quarter records.
    pub fn cleaned_records(&self) -> Result<DataFrame> {
        Ok(self.builder.cleaner().cleaned_records()?)
    }

    /// Zone to area mapping, building the zone cache on first use.
    pub async fn zone_area_mapping(&self) -> Result<ZoneAreaMapping> {
        Ok(self.mapper.zone_area_mapping().await?)
    }

    /// Zone codes of the reference territory.
    pub async fn reference_zone_set(&self) -> Result<ReferenceZoneSet> {
        Ok(self.mapper.reference_zone_set().await?)
    }

    /// Panel for one industry and one side of the foreign split.
    pub async fn build_panel(
        &self,
        selector: &IndustrySelector,
        foreign_only: bool,
    ) -> Result<QuarterlyAreaPanel> {
        let reference = self.reference_zone_set().await?;
        let mapping = self.zone_area_mapping().await?;
        log::info!(
            "Mapped {} of {} reference zones to areas",
            mapping.len(),
            reference.len()
        );

        Ok(self
            .builder
            .build_panel(selector, foreign_only, &mapping, &reference)?)
    }
}

impl DefaultPipeline {
    /// Wire the pipeline to the files and database under the saving directory.
    pub fn from_config(config: &BiteConfig) -> Result<Self> {
        config.validate()?;
        std::fs::create_dir_all(&config.saving_dir).map_err(bite_data::DataError::from)?;

        let store = Rc::new(SqliteCache::new(config.database_path())?);
        let fetcher = HttpFetcher::new(
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )?;

        let raw = SqliteRawStore::new(Rc::clone(&store), config.raw_dir());
        let builder = PanelBuilder::new(raw).with_config(PanelConfig::from_config(config));
        let mapper = ZoneAreaMapper::new(
            ZoneGeometryCache::new(store),
            TigerZoneShapes::from_config(fetcher.clone(), config),
            TigerCountyShapes::from_config(fetcher, config),
        );

        log::debug!("Pipeline using {}", config.database_path().display());
        Ok(Self::new(builder, mapper))
    }
}
