use marquee_physics::fragment::{FragmentSize, TapeColor, TextFragment};
use marquee_physics::spawn::ContainerSize;

const WORDS: &[&str] = &[
    "Lineup", "Tickets", "Camping", "Stages", "Food", "Art", "Map", "FAQ", "Volunteer",
    "Press", "Sunrise", "Afterparty",
];

const TAPES: &[TapeColor] = &[
    TapeColor::Yellow,
    TapeColor::Pink,
    TapeColor::Cyan,
    TapeColor::Lime,
    TapeColor::Orange,
];

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    pub fragment_count: usize,
    pub container: ContainerSize,
    pub font_px: f32,
}

impl SceneConfig {
    /// Deterministic fragments cycling through the word and tape lists.
    pub fn fragments(&self) -> Vec<TextFragment> {
        (0..self.fragment_count)
            .map(|i| {
                let tape = TAPES[i % TAPES.len()];
                TextFragment::new(WORDS[i % WORDS.len()]).with_tape(tape)
            })
            .collect()
    }

    pub fn sizes(&self, fragments: &[TextFragment]) -> Vec<FragmentSize> {
        fragments
            .iter()
            .map(|f| f.estimated_size(self.font_px))
            .collect()
    }
}

/// Return the standard suite: a hero heading up to a crowded footer.
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "hero-4",
            fragment_count: 4,
            container: ContainerSize {
                width: 800.0,
                height: 400.0,
            },
            font_px: 64.0,
        },
        SceneConfig {
            name: "nav-8",
            fragment_count: 8,
            container: ContainerSize {
                width: 1200.0,
                height: 400.0,
            },
            font_px: 48.0,
        },
        SceneConfig {
            name: "footer-16",
            fragment_count: 16,
            container: ContainerSize {
                width: 1200.0,
                height: 500.0,
            },
            font_px: 32.0,
        },
        SceneConfig {
            name: "pile-32",
            fragment_count: 32,
            container: ContainerSize {
                width: 1200.0,
                height: 600.0,
            },
            font_px: 28.0,
        },
    ]
}
