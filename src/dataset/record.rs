pub const EARLY_ERA_END: i32 = 1996;
pub const MIDDLE_ERA_END: i32 = 2012;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Era {
    Early,
    Middle,
    Recent,
}

impl Era {
    pub const ALL: [Era; 3] = [Era::Early, Era::Middle, Era::Recent];

    /// Compares the raw year, so fractional years past a threshold fall on
    /// its far side.
    pub fn of(year: f64) -> Self {
        if year < f64::from(EARLY_ERA_END) {
            Self::Early
        } else if year <= f64::from(MIDDLE_ERA_END) {
            Self::Middle
        } else {
            Self::Recent
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Early => "Pre-1996",
            Self::Middle => "1996–2012",
            Self::Recent => "2013–2025",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimeRecord {
    pub title: String,
    pub genres: String,
    pub score: f32,
    pub members: u64,
    pub year: f64,
    pub kind: String,
    pub episodes: Option<u32>,
    pub scored_by: Option<u64>,
    pub rank: Option<u32>,
    pub popularity: Option<u32>,
    pub favorites: Option<u64>,
}

impl AnimeRecord {
    pub fn era(&self) -> Era {
        Era::of(self.year)
    }

    /// First listed genre token. Genre lists in the dataset are alphabetical.
    pub fn primary_genre(&self) -> &str {
        self.genres
            .split(',')
            .map(str::trim)
            .find(|genre| !genre.is_empty())
            .unwrap_or("")
    }
}

/// Cleaned records split by era, each bucket in file order.
#[derive(Clone, Debug, Default)]
pub struct EraBuckets {
    pub early: Vec<AnimeRecord>,
    pub middle: Vec<AnimeRecord>,
    pub recent: Vec<AnimeRecord>,
    pub dropped_rows: usize,
}

impl EraBuckets {
    pub fn from_records(records: impl IntoIterator<Item = AnimeRecord>) -> Self {
        let mut buckets = Self::default();
        for record in records {
            match record.era() {
                Era::Early => buckets.early.push(record),
                Era::Middle => buckets.middle.push(record),
                Era::Recent => buckets.recent.push(record),
            }
        }
        buckets
    }

    pub fn bucket(&self, era: Era) -> &[AnimeRecord] {
        match era {
            Era::Early => &self.early,
            Era::Middle => &self.middle,
            Era::Recent => &self.recent,
        }
    }

    pub fn record_count(&self) -> usize {
        self.early.len() + self.middle.len() + self.recent.len()
    }
}

#[cfg(test)]
pub(crate) fn sample_record(title: &str, year: i32, score: f32, members: u64) -> AnimeRecord {
    AnimeRecord {
        title: title.to_owned(),
        genres: "Action, Drama".to_owned(),
        score,
        members,
        year: f64::from(year),
        kind: "TV".to_owned(),
        episodes: Some(12),
        scored_by: None,
        rank: None,
        popularity: None,
        favorites: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn era_thresholds_are_inclusive_for_the_middle_era() {
        assert_eq!(Era::of(1995.0), Era::Early);
        assert_eq!(Era::of(1995.5), Era::Early);
        assert_eq!(Era::of(1996.0), Era::Middle);
        assert_eq!(Era::of(2012.0), Era::Middle);
        assert_eq!(Era::of(2012.5), Era::Recent);
        assert_eq!(Era::of(2013.0), Era::Recent);
    }

    #[test]
    fn primary_genre_skips_blank_tokens() {
        let mut record = sample_record("Cowboy Bebop", 1998, 8.75, 1_900_000);
        record.genres = " , Action, Award Winning, Sci-Fi".to_owned();
        assert_eq!(record.primary_genre(), "Action");

        record.genres = String::new();
        assert_eq!(record.primary_genre(), "");
    }

    #[test]
    fn buckets_partition_records_by_year() {
        let records = [1980, 1996, 2005, 2012, 2013, 2024]
            .into_iter()
            .enumerate()
            .map(|(index, year)| sample_record(&format!("title-{index}"), year, 7.0, 20_000))
            .collect::<Vec<_>>();

        let buckets = EraBuckets::from_records(records.clone());

        assert_eq!(buckets.record_count(), records.len());
        for era in Era::ALL {
            assert!(buckets.bucket(era).iter().all(|record| record.era() == era));
        }
        assert_eq!(buckets.early.len(), 1);
        assert_eq!(buckets.middle.len(), 3);
        assert_eq!(buckets.recent.len(), 2);
    }
}
