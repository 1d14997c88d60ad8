use crate::section::{generate_id, Section, SectionMetadata, Sectionizer};

/// Blank-line sectionizer - one section per paragraph
///
/// Paragraphs are separated by exactly two consecutive newlines. Each
/// candidate is trimmed and dropped if nothing is left. A line holding only
/// spaces between two paragraphs does not count as a separator.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankLineSectionizer;

/// Separator between paragraphs.
const SEPARATOR: &str = "\n\n";

impl Sectionizer for BlankLineSectionizer {
    fn name(&self) -> &str {
        "blank-line"
    }

    fn sectionize(&self, content: &str, mut metadata: SectionMetadata) -> Vec<Section> {
        let paragraphs: Vec<&str> = content
            .split(SEPARATOR)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        metadata.total_sections = Some(paragraphs.len());

        paragraphs
            .into_iter()
            .enumerate()
            .map(|(position, p)| {
                let mut m = metadata.clone();
                m.position = position;

                Section {
                    id: generate_id(p),
                    content: p.to_string(),
                    metadata: m,
                }
            })
            .collect()
    }
}
