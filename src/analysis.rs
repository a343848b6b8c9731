//! Bulk dataset path: load once, normalize, keep recent seasons, aggregate on demand.

use crate::aggregate::{aggregate, Aggregation, SelectionOptions, Selector};
use crate::config::DatasetConfig;
use crate::dataset::{CachedDataset, DatasetProvider};
use crate::error::{Result, TransferError};
use crate::normalize::{retain_from_year, BulkNormalizer};
use crate::types::TransferRecord;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{info, instrument};

/// Key handed to the dataset provider for the public player-scores dataset.
pub const DATASET_KEY: &str = "player-scores";

pub struct TransferAnalysis<P: DatasetProvider> {
    dataset: CachedDataset<P>,
    config: DatasetConfig,
    records: OnceCell<Arc<Vec<TransferRecord>>>,
}

impl<P: DatasetProvider> TransferAnalysis<P> {
    pub fn new(provider: P, config: DatasetConfig) -> Self {
        Self {
            dataset: CachedDataset::new(provider, DATASET_KEY),
            config,
            records: OnceCell::new(),
        }
    }

    /// Normalized bulk records from `min_year` onwards, computed once per instance.
    pub fn records(&self) -> Result<Arc<Vec<TransferRecord>>> {
        self.records
            .get_or_try_init(|| {
                let dataset = self.dataset.get()?;
                let table = dataset.table(&self.config.transfers_table)?;
                let records = BulkNormalizer::new().normalize(table);
                Ok::<_, TransferError>(Arc::new(retain_from_year(records, self.config.min_year)))
            })
            .cloned()
    }

    pub fn options(&self) -> Result<SelectionOptions> {
        Ok(SelectionOptions::from_records(&self.records()?))
    }

    #[instrument(skip(self))]
    pub fn aggregate(&self, season: &Selector, team: &Selector) -> Result<Aggregation> {
        if season.specific().is_none() && team.specific().is_none() {
            info!("No specific season or team selected");
            return Ok(Aggregation::InsufficientSelection);
        }
        let records = self.records()?;
        Ok(aggregate(&records, season, team))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::table::RawTable;
    use rust_decimal::Decimal;

    struct FixedProvider(&'static str);

    impl DatasetProvider for FixedProvider {
        fn load(&self, _key: &str) -> Result<Dataset> {
            let mut dataset = Dataset::new();
            dataset.insert("transfers.csv", RawTable::from_csv_reader(self.0.as_bytes())?);
            Ok(dataset)
        }
    }

    const CSV: &str = "\
transfer_season,to_club_name,transfer_fee
10/11,X,100
10/11,Y,200
09/10,X,999
93/94,X,999
,X,999
bad,X,999
";

    fn analysis() -> TransferAnalysis<FixedProvider> {
        TransferAnalysis::new(FixedProvider(CSV), DatasetConfig::default())
    }

    #[test]
    fn test_old_and_unreadable_seasons_are_excluded() {
        let records = analysis().records().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.season == "10/11"));
    }

    #[test]
    fn test_all_wildcards_does_not_load() {
        let analysis = analysis();
        let result = analysis.aggregate(&Selector::All, &Selector::All).unwrap();
        assert_eq!(result, Aggregation::InsufficientSelection);
        assert!(!analysis.dataset.is_loaded());
    }

    #[test]
    fn test_team_across_seasons() {
        let result = analysis()
            .aggregate(&Selector::All, &Selector::Specific("X".into()))
            .unwrap();
        let Aggregation::BySeason(grouped) = result else {
            panic!("expected BySeason");
        };
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped.get("10/11"), Some(Decimal::from(100)));
    }

    #[test]
    fn test_options() {
        let options = analysis().options().unwrap();
        assert_eq!(options.seasons, vec!["10/11"]);
        assert_eq!(options.teams, vec!["X", "Y"]);
    }

    #[test]
    fn test_missing_transfers_table() {
        let config = DatasetConfig {
            transfers_table: "moves.csv".to_string(),
            ..DatasetConfig::default()
        };
        let analysis = TransferAnalysis::new(FixedProvider(CSV), config);
        assert!(matches!(analysis.records(), Err(TransferError::DatasetTableMissing(_))));
    }
}
