/// The public landing page. Static marketing copy and the navigation entry
/// into the app; no data dependency.
#[derive(Debug, Default)]
pub struct Landing;

impl Landing {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn render(&self) -> String {
        [
            "Portfolio Analyzer",
            "Analyseer je beleggingsportefeuille op risicospreiding, sectoren, \
             regio's en market cap.",
            "[Inloggen]",
        ]
        .join("\n")
    }
}
