use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use super::parse::{RawRow, clean_row, parse_json_rows};
use super::record::EraBuckets;

pub const DEFAULT_MIN_MEMBERS: u64 = 10_000;

#[derive(Clone, Copy, Debug)]
pub struct LoaderConfig {
    pub min_members: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            min_members: DEFAULT_MIN_MEMBERS,
        }
    }
}

pub fn load_dataset(path: &Path, config: &LoaderConfig) -> Result<EraBuckets> {
    let is_json = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

    let (rows, unreadable) = if is_json {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset {}", path.display()))?;
        (parse_json_rows(&raw)?, 0)
    } else {
        let file = fs::File::open(path)
            .with_context(|| format!("failed to open dataset {}", path.display()))?;
        read_csv_rows(file).with_context(|| format!("failed to read CSV {}", path.display()))?
    };

    let buckets = bucket_rows(rows, unreadable, config);
    tracing::info!(
        path = %path.display(),
        early = buckets.early.len(),
        middle = buckets.middle.len(),
        recent = buckets.recent.len(),
        dropped = buckets.dropped_rows,
        "dataset loaded"
    );
    Ok(buckets)
}

/// Returns the deserialized rows plus the number of records the CSV reader
/// could not decode at all.
pub(super) fn read_csv_rows<R: Read>(reader: R) -> Result<(Vec<RawRow>, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    reader.headers().context("missing CSV header row")?;

    let mut rows = Vec::new();
    let mut unreadable = 0usize;
    for result in reader.deserialize::<RawRow>() {
        match result {
            Ok(row) => rows.push(row),
            Err(error) => {
                unreadable += 1;
                tracing::trace!(%error, "skipping undecodable CSV record");
            }
        }
    }
    Ok((rows, unreadable))
}

pub(super) fn bucket_rows(
    rows: Vec<RawRow>,
    unreadable: usize,
    config: &LoaderConfig,
) -> EraBuckets {
    let total = rows.len();
    let records = rows
        .into_iter()
        .filter_map(|row| clean_row(row, config.min_members))
        .collect::<Vec<_>>();

    let dropped = unreadable + (total - records.len());
    if dropped > 0 {
        tracing::debug!(dropped, kept = records.len(), "dropped incomplete dataset rows");
    }

    let mut buckets = EraBuckets::from_records(records);
    buckets.dropped_rows = dropped;
    buckets
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dataset::record::Era;

    const SAMPLE: &str = "\
title,genres,score,members,year,type,episodes,scored_by,rank,popularity,favorites,studio
Akira,\"Action, Adventure, Sci-Fi\",8.16,400000,1988,Movie,1,200000,400,300,5000,TMS
Missing Year,Action,7.1,50000,,TV,12,1,1,1,1,X
Neon Genesis Evangelion,\"Action, Avant Garde, Drama\",8.35,1800000,1995,TV,26,900000,200,30,40000,G
Cowboy Bebop,\"Action, Award Winning, Sci-Fi\",8.75,1900000,1998,TV,26,950000,40,40,80000,Sunrise
Obscure,Comedy,6.0,9000,2005,OVA,2,100,9000,9000,3,Y
Steins;Gate,\"Drama, Sci-Fi, Suspense\",9.07,2600000,2011,TV,24,1400000,3,13,190000,White Fox
Toradora!,\"Romance\",7.8,2100000,2012,TV,25,1000000,900,50,30000,JC
Frieren,\"Adventure, Drama, Fantasy\",9.3,1000000,2023,TV,28,500000,1,150,60000,Madhouse
No Type,Drama,7.0,30000,2020,,12,1,1,1,1,Z
";

    fn load_sample() -> EraBuckets {
        let (rows, unreadable) = read_csv_rows(SAMPLE.as_bytes()).expect("sample parses");
        bucket_rows(rows, unreadable, &LoaderConfig::default())
    }

    fn titles(records: &[crate::dataset::AnimeRecord]) -> Vec<&str> {
        records.iter().map(|record| record.title.as_str()).collect()
    }

    #[test]
    fn incomplete_rows_are_excluded_from_every_bucket() {
        let buckets = load_sample();
        let all = Era::ALL
            .into_iter()
            .flat_map(|era| titles(buckets.bucket(era)))
            .collect::<HashSet<_>>();

        assert!(!all.contains("Missing Year"));
        assert!(!all.contains("Obscure"));
        assert!(!all.contains("No Type"));
        assert_eq!(buckets.dropped_rows, 3);
    }

    #[test]
    fn buckets_partition_the_cleaned_rows_in_file_order() {
        let buckets = load_sample();

        assert_eq!(titles(&buckets.early), vec!["Akira", "Neon Genesis Evangelion"]);
        assert_eq!(
            titles(&buckets.middle),
            vec!["Cowboy Bebop", "Steins;Gate", "Toradora!"]
        );
        assert_eq!(titles(&buckets.recent), vec!["Frieren"]);
        assert_eq!(buckets.record_count(), 6);
    }

    #[test]
    fn member_threshold_is_configurable() {
        let (rows, unreadable) = read_csv_rows(SAMPLE.as_bytes()).expect("sample parses");
        let buckets = bucket_rows(rows, unreadable, &LoaderConfig { min_members: 1_000_000 });

        assert_eq!(titles(&buckets.early), vec!["Neon Genesis Evangelion"]);
        assert_eq!(
            titles(&buckets.middle),
            vec!["Cowboy Bebop", "Steins;Gate", "Toradora!"]
        );
        assert!(buckets.recent.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = load_dataset(
            Path::new("/definitely/not/here/anime.csv"),
            &LoaderConfig::default(),
        );
        assert!(result.is_err());
    }
}
