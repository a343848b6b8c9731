use anyhow::Result;
use rust_decimal::Decimal;
use std::fs;
use tempfile::tempdir;
use transfer_fees::analysis::TransferAnalysis;
use transfer_fees::config::DatasetConfig;
use transfer_fees::dataset::DirectoryProvider;
use transfer_fees::report::{format_eur, render_aggregation, INSUFFICIENT_SELECTION};
use transfer_fees::{Aggregation, Selector};

const TRANSFERS: &str = "\
player_id,transfer_date,transfer_season,from_club_id,to_club_id,from_club_name,to_club_name,transfer_fee,market_value_in_eur,player_name
1,2010-07-01,10/11,10,20,Ajax,X,100,,One
2,2010-07-02,10/11,10,30,Ajax,Y,200,,Two
3,2009-07-01,09/10,10,20,Ajax,X,5000,,Three
4,1993-07-01,93/94,10,20,Ajax,X,5000,,Four
5,2012-07-01,,10,20,Ajax,X,5000,,Five
6,2011-07-01,11/12,10,20,Ajax,X,,,Six
7,2011-07-01,11/12,10,20,Ajax,X,not a number,,Seven
";

fn analysis_with(csv: &str) -> Result<(tempfile::TempDir, TransferAnalysis<DirectoryProvider>)> {
    let dir = tempdir()?;
    fs::write(dir.path().join("transfers.csv"), csv)?;
    fs::write(dir.path().join("clubs.csv"), "club_id,name\n20,X\n")?;
    let provider = DirectoryProvider::new(dir.path()).with_tables(&["transfers.csv"]);
    Ok((dir, TransferAnalysis::new(provider, DatasetConfig::default())))
}

fn specific(value: &str) -> Selector {
    Selector::Specific(value.to_string())
}

#[test]
fn test_season_selected_groups_by_team() -> Result<()> {
    let (_dir, analysis) = analysis_with(TRANSFERS)?;
    let result = analysis.aggregate(&specific("10/11"), &Selector::All)?;

    let Aggregation::ByTeam(grouped) = result else {
        panic!("expected ByTeam");
    };
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped.get("X"), Some(Decimal::from(100)));
    assert_eq!(grouped.get("Y"), Some(Decimal::from(200)));
    Ok(())
}

#[test]
fn test_team_selected_groups_by_season() -> Result<()> {
    let (_dir, analysis) = analysis_with(TRANSFERS)?;
    let result = analysis.aggregate(&Selector::All, &specific("X"))?;

    let Aggregation::BySeason(grouped) = result else {
        panic!("expected BySeason");
    };
    // 09/10 and 93/94 are below the year threshold; 11/12 has no usable fee
    let seasons: Vec<&str> = grouped.entries().iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(seasons, vec!["10/11"]);
    assert_eq!(grouped.get("10/11"), Some(Decimal::from(100)));
    Ok(())
}

#[test]
fn test_both_selected_is_scalar() -> Result<()> {
    let (_dir, analysis) = analysis_with(TRANSFERS)?;
    let season = specific("10/11");
    let team = specific("x");
    let result = analysis.aggregate(&season, &team)?;

    assert_eq!(result, Aggregation::Total(Decimal::from(100)));
    assert_eq!(format_eur(Decimal::from(100)), "EUR 100.00");
    assert_eq!(
        render_aggregation(&result, &season, &team),
        "Total Transfer Fees for x in 10/11: EUR 100.00"
    );
    Ok(())
}

#[test]
fn test_wildcards_ask_for_a_selection() -> Result<()> {
    let (_dir, analysis) = analysis_with(TRANSFERS)?;
    let season = Selector::parse("All Seasons");
    let team = Selector::parse("All Teams");
    let result = analysis.aggregate(&season, &team)?;

    assert_eq!(result, Aggregation::InsufficientSelection);
    assert_eq!(render_aggregation(&result, &season, &team), INSUFFICIENT_SELECTION);
    Ok(())
}

#[test]
fn test_options_only_cover_recent_seasons() -> Result<()> {
    let (_dir, analysis) = analysis_with(TRANSFERS)?;
    let options = analysis.options()?;

    assert_eq!(options.seasons, vec!["10/11", "11/12"]);
    assert_eq!(options.teams, vec!["X", "Y"]);
    Ok(())
}

#[test]
fn test_missing_dataset_dir_is_recoverable() {
    let provider = DirectoryProvider::new("/no/such/dataset");
    let analysis = TransferAnalysis::new(provider, DatasetConfig::default());

    assert!(analysis.aggregate(&specific("10/11"), &Selector::All).is_err());
    // Wildcards never touch the dataset
    assert_eq!(
        analysis.aggregate(&Selector::All, &Selector::All).unwrap(),
        Aggregation::InsufficientSelection
    );
}
