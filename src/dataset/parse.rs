use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::record::AnimeRecord;

/// One dataset row before coercion. Every field stays textual so a single
/// malformed cell drops the row instead of failing the whole file.
#[derive(Clone, Debug, Default, Deserialize)]
pub(super) struct RawRow {
    #[serde(default)]
    pub(super) title: Option<String>,
    #[serde(default)]
    pub(super) genres: Option<String>,
    #[serde(default)]
    pub(super) score: Option<String>,
    #[serde(default)]
    pub(super) members: Option<String>,
    #[serde(default)]
    pub(super) year: Option<String>,
    #[serde(default, rename = "type")]
    pub(super) kind: Option<String>,
    #[serde(default)]
    pub(super) episodes: Option<String>,
    #[serde(default)]
    pub(super) scored_by: Option<String>,
    #[serde(default)]
    pub(super) rank: Option<String>,
    #[serde(default)]
    pub(super) popularity: Option<String>,
    #[serde(default)]
    pub(super) favorites: Option<String>,
}

impl RawRow {
    fn from_json_object(object: &Map<String, Value>) -> Self {
        let field = |name: &str| object.get(name).and_then(json_cell);
        Self {
            title: field("title"),
            genres: field("genres"),
            score: field("score"),
            members: field("members"),
            year: field("year"),
            kind: field("type"),
            episodes: field("episodes"),
            scored_by: field("scored_by"),
            rank: field("rank"),
            popularity: field("popularity"),
            favorites: field("favorites"),
        }
    }
}

fn json_cell(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

pub(super) fn parse_json_rows(raw: &str) -> Result<Vec<RawRow>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON dataset")?;

    let rows = match &parsed {
        Value::Array(rows) => rows,
        Value::Object(object) => object
            .get("rows")
            .or_else(|| object.get("data"))
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("JSON dataset object has no `rows` or `data` array"))?,
        _ => return Err(anyhow!("unexpected JSON type for dataset")),
    };

    Ok(rows
        .iter()
        .filter_map(Value::as_object)
        .map(RawRow::from_json_object)
        .collect())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_number(value: Option<&str>) -> Option<f64> {
    non_empty(value)?
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

fn parse_count<T: TryFrom<u64>>(value: Option<&str>) -> Option<T> {
    let number = parse_number(value).filter(|number| *number >= 0.0)?;
    T::try_from(number as u64).ok()
}

/// Coerces a raw row, returning `None` when a required field is missing or
/// invalid, or the title sits at or below the member threshold. Thresholds
/// compare the parsed values before any integer truncation.
pub(super) fn clean_row(raw: RawRow, min_members: u64) -> Option<AnimeRecord> {
    let title = non_empty(raw.title.as_deref())?.to_owned();
    let genres = non_empty(raw.genres.as_deref())?.to_owned();
    let kind = non_empty(raw.kind.as_deref())?.to_owned();
    let year = parse_number(raw.year.as_deref())?;
    let score = parse_number(raw.score.as_deref())?;
    let members = parse_number(raw.members.as_deref()).filter(|members| *members >= 0.0)?;

    if members <= min_members as f64 {
        return None;
    }

    Some(AnimeRecord {
        title,
        genres,
        score: score as f32,
        members: members as u64,
        year,
        kind,
        episodes: parse_count(raw.episodes.as_deref()),
        scored_by: parse_count(raw.scored_by.as_deref()),
        rank: parse_count(raw.rank.as_deref()),
        popularity: parse_count(raw.popularity.as_deref()),
        favorites: parse_count(raw.favorites.as_deref()),
    })
}
