use eframe::egui::Color32;

use crate::dataset::{AnimeRecord, Era};
use crate::util::stable_slot;

use super::BubbleNode;
use super::render_utils::blend_color;

pub(in crate::app) const RECOLOR_TRANSITION_SECS: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum ColorMode {
    Genre,
    Era,
    Score,
}

impl ColorMode {
    pub(in crate::app) const ALL: [ColorMode; 3] =
        [ColorMode::Genre, ColorMode::Era, ColorMode::Score];

    pub(in crate::app) fn label(self) -> &'static str {
        match self {
            Self::Genre => "Genre",
            Self::Era => "Era",
            Self::Score => "Score",
        }
    }
}

pub(in crate::app) const GENRES: [&str; 18] = [
    "Action",
    "Adventure",
    "Avant Garde",
    "Award Winning",
    "Boys Love",
    "Comedy",
    "Drama",
    "Fantasy",
    "Girls Love",
    "Gourmet",
    "Horror",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Slice of Life",
    "Sports",
    "Supernatural",
    "Suspense",
];

const GENRE_PALETTE: [Color32; 18] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
    Color32::from_rgb(0x39, 0x3b, 0x79),
    Color32::from_rgb(0x63, 0x79, 0x39),
    Color32::from_rgb(0x8c, 0x6d, 0x31),
    Color32::from_rgb(0x84, 0x3c, 0x39),
    Color32::from_rgb(0x7b, 0x41, 0x73),
    Color32::from_rgb(0x31, 0x82, 0xbd),
    Color32::from_rgb(0xe6, 0x55, 0x0d),
    Color32::from_rgb(0x31, 0xa3, 0x54),
];

const ERA_PALETTE: [Color32; 3] = [
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x1f, 0x77, 0xb4),
];

// Sequential "Blues" scheme, lightest to darkest.
const BLUES: [[f32; 3]; 9] = [
    [247.0, 251.0, 255.0],
    [222.0, 235.0, 247.0],
    [198.0, 219.0, 239.0],
    [158.0, 202.0, 225.0],
    [107.0, 174.0, 214.0],
    [66.0, 146.0, 198.0],
    [33.0, 113.0, 181.0],
    [8.0, 81.0, 156.0],
    [8.0, 48.0, 107.0],
];

pub(in crate::app) const SCORE_MIN: f32 = 0.0;
pub(in crate::app) const SCORE_MAX: f32 = 10.0;

const SCORE_BUCKETS: [(&str, f32); 10] = [
    ("10-9", 9.5),
    ("9-8", 8.5),
    ("8-7", 7.5),
    ("7-6", 6.5),
    ("6-5", 5.5),
    ("5-4", 4.5),
    ("4-3", 3.5),
    ("3-2", 2.5),
    ("2-1", 1.5),
    ("1-0", 0.5),
];

pub(in crate::app) fn genre_color(genre: &str) -> Color32 {
    let slot = GENRES
        .iter()
        .position(|known| *known == genre)
        .unwrap_or_else(|| stable_slot(genre, GENRE_PALETTE.len()));
    GENRE_PALETTE[slot]
}

pub(in crate::app) fn era_color(era: Era) -> Color32 {
    match era {
        Era::Early => ERA_PALETTE[0],
        Era::Middle => ERA_PALETTE[1],
        Era::Recent => ERA_PALETTE[2],
    }
}

fn basis(t1: f32, v0: f32, v1: f32, v2: f32, v3: f32) -> f32 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

/// Uniform B-spline through the Blues stops; `t` is clamped to `[0, 1]`.
pub(in crate::app) fn interpolate_blues(t: f32) -> Color32 {
    let n = BLUES.len() - 1;
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let i = ((t * n as f32).floor() as usize).min(n - 1);
    let local = (t - i as f32 / n as f32) * n as f32;

    let channel = |c: usize| {
        let v1 = BLUES[i][c];
        let v2 = BLUES[i + 1][c];
        let v0 = if i > 0 { BLUES[i - 1][c] } else { 2.0 * v1 - v2 };
        let v3 = if i < n - 1 {
            BLUES[i + 2][c]
        } else {
            2.0 * v2 - v1
        };
        basis(local, v0, v1, v2, v3).round().clamp(0.0, 255.0) as u8
    };

    Color32::from_rgb(channel(0), channel(1), channel(2))
}

pub(in crate::app) fn score_position(score: f32) -> f32 {
    ((score - SCORE_MIN) / (SCORE_MAX - SCORE_MIN)).clamp(0.0, 1.0)
}

pub(in crate::app) fn score_color(score: f32) -> Color32 {
    interpolate_blues(score_position(score))
}

pub(in crate::app) fn color_for(
    mode: ColorMode,
    primary_genre: &str,
    record: &AnimeRecord,
) -> Color32 {
    match mode {
        ColorMode::Genre => genre_color(primary_genre),
        ColorMode::Era => era_color(record.era()),
        ColorMode::Score => score_color(record.score),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct LegendEntry {
    pub(in crate::app) label: String,
    pub(in crate::app) color: Color32,
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct Legend {
    pub(in crate::app) mode: ColorMode,
    pub(in crate::app) entries: Vec<LegendEntry>,
}

pub(in crate::app) fn legend_for(mode: ColorMode) -> Legend {
    let entries = match mode {
        ColorMode::Genre => GENRES
            .iter()
            .map(|genre| LegendEntry {
                label: (*genre).to_owned(),
                color: genre_color(genre),
            })
            .collect(),
        ColorMode::Era => Era::ALL
            .into_iter()
            .map(|era| LegendEntry {
                label: era.label().to_owned(),
                color: era_color(era),
            })
            .collect(),
        ColorMode::Score => SCORE_BUCKETS
            .iter()
            .map(|(label, midpoint)| LegendEntry {
                label: (*label).to_owned(),
                color: score_color(*midpoint),
            })
            .collect(),
    };

    Legend { mode, entries }
}

impl BubbleNode {
    pub(in crate::app) fn display_fill(&self, now: f64) -> Color32 {
        let progress = ((now - self.fill_changed_at) / RECOLOR_TRANSITION_SECS).clamp(0.0, 1.0);
        blend_color(self.previous_fill, self.fill, progress as f32)
    }

    pub(in crate::app) fn is_fill_transitioning(&self, now: f64) -> bool {
        now - self.fill_changed_at < RECOLOR_TRANSITION_SECS && self.previous_fill != self.fill
    }
}

/// Re-derives every node's fill for `mode` and rebuilds the legend. Nodes fade
/// from whatever they currently show.
pub(in crate::app) fn recolor(nodes: &mut [BubbleNode], mode: ColorMode, now: f64) -> Legend {
    for node in nodes.iter_mut() {
        node.previous_fill = node.display_fill(now);
        node.fill = color_for(mode, &node.primary_genre, &node.record);
        node.fill_changed_at = now;
    }
    legend_for(mode)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::app::BubbleGraph;
    use crate::dataset::sample_record;

    fn graph_with_years(years: &[i32]) -> BubbleGraph {
        let records = years
            .iter()
            .enumerate()
            .map(|(index, year)| sample_record(&format!("title-{index}"), *year, 7.0, 40_000))
            .collect::<Vec<_>>();
        let mut graph = BubbleGraph::default();
        graph.merge_batch(&records, ColorMode::Genre, 0.0);
        graph
    }

    #[test]
    fn era_mode_uses_one_distinct_color_per_era() {
        let mut graph = graph_with_years(&[1970, 1995, 1996, 2004, 2012, 2013, 2025]);
        recolor(&mut graph.nodes, ColorMode::Era, 10.0);

        let mut by_era = [HashSet::new(), HashSet::new(), HashSet::new()];
        for node in &graph.nodes {
            let slot = match node.record.year {
                year if year < 1996.0 => 0,
                year if year <= 2012.0 => 1,
                _ => 2,
            };
            by_era[slot].insert(node.fill);
        }

        assert!(by_era.iter().all(|colors| colors.len() == 1));
        let distinct = by_era
            .iter()
            .flat_map(|colors| colors.iter().copied())
            .collect::<HashSet<_>>();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn score_colors_never_get_lighter_as_score_rises() {
        let mut previous = score_color(-1.0);
        for step in 0..=120 {
            let color = score_color(step as f32 / 10.0);
            assert!(color.r() <= previous.r(), "red rose at score step {step}");
            assert!(color.g() <= previous.g(), "green rose at score step {step}");
            assert!(color.b() <= previous.b(), "blue rose at score step {step}");
            previous = color;
        }
    }

    #[test]
    fn blues_hits_its_end_stops() {
        assert_eq!(interpolate_blues(1.0), Color32::from_rgb(8, 48, 107));
        assert_eq!(interpolate_blues(f32::NAN), interpolate_blues(0.0));
    }

    #[test]
    fn genre_legend_lists_every_known_genre() {
        let legend = legend_for(ColorMode::Genre);
        let labels = legend
            .entries
            .iter()
            .map(|entry| entry.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, GENRES.to_vec());
    }

    #[test]
    fn score_legend_has_ten_descending_buckets() {
        let legend = legend_for(ColorMode::Score);
        assert_eq!(legend.entries.len(), 10);
        assert_eq!(legend.entries[0].label, "10-9");
        assert_eq!(legend.entries[0].color, score_color(9.5));
        assert_eq!(legend.entries[9].color, score_color(0.5));
    }

    #[test]
    fn unknown_genres_still_get_a_palette_color() {
        let color = genre_color("Ecchi");
        assert!(GENRE_PALETTE.contains(&color));
        assert_eq!(color, genre_color("Ecchi"));
    }

    #[test]
    fn recolor_fades_from_the_displayed_fill() {
        let mut graph = graph_with_years(&[1990]);
        let genre_fill = graph.nodes[0].fill;

        recolor(&mut graph.nodes, ColorMode::Score, 1.0);
        let node = &graph.nodes[0];
        assert_eq!(node.previous_fill, genre_fill);
        assert_eq!(node.fill, score_color(7.0));
        assert!(node.is_fill_transitioning(1.2));
        assert_eq!(node.display_fill(1.0 + RECOLOR_TRANSITION_SECS), node.fill);
    }
}
