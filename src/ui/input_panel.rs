use eframe::egui;

use crate::command::{parse_repeat, RunParameters};

const FIELD_WIDTH: f32 = 110.0;

/// Editable run parameters. Nothing is validated here beyond what the
/// getters parse.
#[derive(Debug, Default, Clone)]
pub struct InputPanel {
    pub algorithm: String,
    pub fire_start: String,
    pub fire_end: String,
    pub data_size_start: String,
    pub data_size_end: String,
    pub use_iterative: bool,
    pub repeat: String,
}

impl InputPanel {
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn fire_start(&self) -> &str {
        &self.fire_start
    }

    pub fn fire_end(&self) -> &str {
        &self.fire_end
    }

    pub fn data_size_start(&self) -> &str {
        &self.data_size_start
    }

    pub fn data_size_end(&self) -> &str {
        &self.data_size_end
    }

    pub fn use_iterative(&self) -> bool {
        self.use_iterative
    }

    pub fn repeat(&self) -> i32 {
        parse_repeat(&self.repeat)
    }

    /// Snapshot handed to the worker thread.
    pub fn parameters(&self) -> RunParameters {
        RunParameters {
            algorithm: self.algorithm.clone(),
            fire_start: self.fire_start.clone(),
            fire_end: self.fire_end.clone(),
            data_size_start: self.data_size_start.clone(),
            data_size_end: self.data_size_end.clone(),
            use_iterative: self.use_iterative,
            repeat: self.repeat(),
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let fields = [
            (&mut self.algorithm, "Algorithm (e.g., quick_sort)", FIELD_WIDTH * 1.6),
            (&mut self.fire_start, "Fire Start", FIELD_WIDTH),
            (&mut self.fire_end, "Fire End", FIELD_WIDTH),
            (&mut self.data_size_start, "Data Size Start", FIELD_WIDTH),
            (&mut self.data_size_end, "Data Size End", FIELD_WIDTH),
        ];
        for (text, hint, width) in fields {
            ui.add(egui::TextEdit::singleline(text).hint_text(hint).desired_width(width));
        }
        ui.checkbox(&mut self.use_iterative, "Use Iterative");
        ui.add(
            egui::TextEdit::singleline(&mut self.repeat)
                .hint_text("Repeat tests count")
                .desired_width(FIELD_WIDTH),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parameters_snapshot() {
        let panel = InputPanel {
            algorithm: "quick_sort".to_string(),
            fire_start: "0".to_string(),
            fire_end: "10".to_string(),
            use_iterative: true,
            repeat: "oops".to_string(),
            ..InputPanel::default()
        };
        let params = panel.parameters();
        assert_eq!(params.algorithm, "quick_sort");
        assert_eq!(params.fire_end, "10");
        assert_eq!(params.data_size_start, "");
        assert!(params.use_iterative);
        assert_eq!(params.repeat, 1);
        assert_eq!(panel.repeat(), 1);
    }
}
