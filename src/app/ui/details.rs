use eframe::egui::{Color32, RichText, Sense, Ui, vec2};

use crate::util::{format_count, format_optional};

use super::super::ViewModel;

impl ViewModel {
    /// Swatch color for the selection, tracking the canvas through a recolor fade.
    fn selected_fill(&self, now: f64) -> Option<Color32> {
        let title = self.selected.as_deref()?;
        self.graph
            .node_by_title(title)
            .map(|node| node.display_fill(now))
    }

    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected_title) = self.selected.clone() else {
            ui.label("Click a bubble or a ranking row to inspect a title.");
            return;
        };

        let Some(node) = self.graph.node_by_title(&selected_title) else {
            ui.label("Selected title is not shown on the chart.");
            return;
        };
        let record = &node.record;

        ui.label(RichText::new(record.title.as_str()).strong().size(18.0));
        let fill = self
            .selected_fill(ui.input(|input| input.time))
            .unwrap_or(node.fill);
        ui.horizontal(|ui| {
            let (swatch, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
            ui.painter().rect_filled(swatch, 2.0, fill);
            ui.label(format!("{} · {}", record.era().label(), node.primary_genre));
        });
        ui.add_space(6.0);

        ui.label(format!("Type: {}", record.kind));
        ui.label(format!("Year: {}", record.year));
        ui.label(format!("Genres: {}", record.genres));
        ui.label(format!("Episodes: {}", format_optional(record.episodes)));

        ui.separator();
        ui.label(RichText::new("Reception").strong());
        ui.label(format!("Score: {:.2}", record.score));
        ui.label(format!(
            "Scored by: {}",
            record.scored_by.map_or_else(|| "n/a".to_owned(), format_count)
        ));
        ui.label(format!("Members: {}", format_count(record.members)));
        ui.label(format!(
            "Favorites: {}",
            record.favorites.map_or_else(|| "n/a".to_owned(), format_count)
        ));
        ui.label(format!("Rank: {}", format_optional(record.rank.map(|rank| format!("#{rank}")))));
        ui.label(format!(
            "Popularity: {}",
            format_optional(record.popularity.map(|popularity| format!("#{popularity}")))
        ));

        ui.add_space(8.0);
        if ui.button("Clear selection").clicked() {
            self.set_selected(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::app::encoding::{ColorMode, RECOLOR_TRANSITION_SECS, recolor};
    use crate::dataset::{EraBuckets, sample_record};

    #[test]
    fn swatch_follows_the_recolor_fade() {
        let buckets = EraBuckets::from_records([sample_record("Akira", 1988, 8.2, 400_000)]);
        let mut model = ViewModel::new(buckets, 6.0);
        model.start(0.0);
        model.set_selected(Some("Akira".to_owned()));

        recolor(&mut model.graph.nodes, ColorMode::Score, 10.0);
        let node = &model.graph.nodes[0];
        let halfway = 10.0 + RECOLOR_TRANSITION_SECS / 2.0;

        assert_eq!(model.selected_fill(halfway), Some(node.display_fill(halfway)));
        assert_ne!(model.selected_fill(halfway), Some(node.fill));
        assert_eq!(
            model.selected_fill(10.0 + RECOLOR_TRANSITION_SECS),
            Some(node.fill)
        );

        model.set_selected(None);
        assert_eq!(model.selected_fill(halfway), None);
    }
}
