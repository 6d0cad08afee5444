//! The roadmap shipped with the application.

use crate::roadmap::Roadmap;

const DEFAULT_ROADMAP: &str = include_str!("../assets/default_roadmap.json");

impl Roadmap {
    /// The bundled bioinformatics learning roadmap, used when nothing has
    /// been saved yet or the saved copy is unreadable.
    pub fn bundled() -> Self {
        match serde_json::from_str(DEFAULT_ROADMAP) {
            Ok(roadmap) => roadmap,
            Err(e) => {
                tracing::error!("Bundled roadmap is invalid: {}", e);
                Roadmap::new("Learning Roadmap", "")
            }
        }
    }
}
