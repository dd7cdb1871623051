pub mod fetch_history;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub details: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            details: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn render_text(&self) -> String {
        let mut out = format!("{}: ok\n", self.command);
        for detail in &self.details {
            out.push_str(&format!("  {detail}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::CommandReport;

    #[test]
    fn text_rendering_lists_details_in_order() {
        let mut report = CommandReport::new("fetch-history");
        report.detail("pages=1");
        report.detail("kept=0");

        assert_eq!(
            report.render_text(),
            "fetch-history: ok\n  pages=1\n  kept=0\n"
        );
    }
}
