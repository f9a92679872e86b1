use eframe::egui;

/// The read-only text area holding process output and status lines.
#[derive(Debug, Default, Clone)]
pub struct OutputLog {
    text: String,
}

impl OutputLog {
    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                // A `&str` buffer keeps the widget non-editable
                ui.add(
                    egui::TextEdit::multiline(&mut self.text.as_str())
                        .font(egui::TextStyle::Monospace)
                        .desired_width(f32::INFINITY),
                );
            });
    }
}
