//! Turns a free-text chat completion into a structured recipe.
//!
//! Completions mark their headings with `**`, e.g.
//!
//! ```text
//! **Tomato Soup**
//! Intro text
//! **Ingredients**
//! - tomato
//! **Instructions**
//! 1. Boil
//! ```
//!
//! Splitting on the marker yields alternating plain and marked segments. The
//! first marked segment is the title. A segment mentioning "ingredients" or
//! "instructions" labels the segment that follows it. Parsing is total: text
//! without any structure parses to the fallback title and empty lists.

use log::debug;

use crate::model::{Recipe, RecipeId, FALLBACK_TITLE};

const SEGMENT_MARKER: &str = "**";
const BULLETS: [char; 3] = ['-', '*', '•'];

/// Recipe content extracted from a completion, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl ParsedRecipe {
    pub fn into_recipe(self, id: RecipeId) -> Recipe {
        Recipe {
            id,
            title: self.title,
            ingredients: self.ingredients,
            instructions: self.instructions,
            is_favorite: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Ingredients,
    Instructions,
}

impl Section {
    fn label(self) -> &'static str {
        match self {
            Section::Ingredients => "ingredients",
            Section::Instructions => "instructions",
        }
    }

    fn clean_line(self, line: &str) -> String {
        match self {
            Section::Ingredients => strip_bullet(line),
            Section::Instructions => strip_enumeration(line),
        }
    }
}

/// Capture progress for one section while walking the segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    /// No label seen yet
    Waiting,
    /// Label seen on the previous segment, this segment is the body
    Armed,
    /// First label already consumed; later labels are ignored
    Done,
}

struct SectionCapture {
    section: Section,
    state: Capture,
    lines: Vec<String>,
}

impl SectionCapture {
    fn new(section: Section) -> Self {
        Self {
            section,
            state: Capture::Waiting,
            lines: Vec::new(),
        }
    }

    /// Advance the state machine by one segment
    fn feed(&mut self, segment: &str, lowercase: &str) {
        if self.state == Capture::Armed {
            self.lines = segment
                .lines()
                .map(|line| self.section.clean_line(line))
                .filter(|line| !line.is_empty())
                .collect();
            self.state = Capture::Done;
        }

        if self.state == Capture::Waiting && lowercase.contains(self.section.label()) {
            self.state = Capture::Armed;
        }
    }
}

/// Parse a completion into its title, ingredient lines and instruction lines
pub fn parse_completion(text: &str) -> ParsedRecipe {
    let segments: Vec<&str> = text.split(SEGMENT_MARKER).collect();

    let title = segments
        .get(1)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_TITLE)
        .to_string();

    let mut ingredients = SectionCapture::new(Section::Ingredients);
    let mut instructions = SectionCapture::new(Section::Instructions);

    for segment in &segments {
        let lowercase = segment.to_lowercase();
        ingredients.feed(segment, &lowercase);
        instructions.feed(segment, &lowercase);
    }

    debug!(
        "Parsed completion into '{}' with {} ingredients and {} instructions ({} segments)",
        title,
        ingredients.lines.len(),
        instructions.lines.len(),
        segments.len()
    );

    ParsedRecipe {
        title,
        ingredients: ingredients.lines,
        instructions: instructions.lines,
    }
}

/// Remove one leading bullet marker, e.g. `- 2 eggs` -> `2 eggs`
fn strip_bullet(line: &str) -> String {
    let line = line.trim();
    line.strip_prefix(BULLETS).unwrap_or(line).trim().to_string()
}

/// Remove one leading enumeration, e.g. `12. Stir` or `3) Stir` -> `Stir`
fn strip_enumeration(line: &str) -> String {
    let line = line.trim();
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(['.', ')']) {
            return rest.trim().to_string();
        }
    }
    line.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tomato_soup_scenario() {
        let text = "**Tomato Soup**\nIntro text\n**Ingredients**\n- tomato\n- salt\n**Instructions**\n1. Boil\n2. Blend";
        let parsed = parse_completion(text);

        assert_eq!(parsed.title, "Tomato Soup");
        assert_eq!(parsed.ingredients, vec!["tomato", "salt"]);
        assert_eq!(parsed.instructions, vec!["Boil", "Blend"]);
    }

    #[test]
    fn test_no_markers_yields_defaults() {
        for text in [
            "",
            "just some text",
            "Ingredients\n- egg\nInstructions\n1. Fry",
            "*single*",
        ] {
            let parsed = parse_completion(text);
            assert_eq!(parsed.title, FALLBACK_TITLE);
            assert!(parsed.ingredients.is_empty(), "input: {:?}", text);
            assert!(parsed.instructions.is_empty(), "input: {:?}", text);
        }
    }

    #[test]
    fn test_empty_title_segment_falls_back() {
        let parsed = parse_completion("****\n**Ingredients**\n- flour");
        assert_eq!(parsed.title, FALLBACK_TITLE);
        assert_eq!(parsed.ingredients, vec!["flour"]);
    }

    #[test]
    fn test_labels_are_case_insensitive_and_may_carry_colons() {
        let text = "**Pancakes**\n**INGREDIENTS:**\n- 2 eggs\n- 1 cup flour\n**Cooking Instructions:**\n1. Whisk\n2. Fry";
        let parsed = parse_completion(text);

        assert_eq!(parsed.ingredients, vec!["2 eggs", "1 cup flour"]);
        assert_eq!(parsed.instructions, vec!["Whisk", "Fry"]);
    }

    #[test]
    fn test_reordered_sections() {
        let text = "**Salad**\n**Instructions**\n1. Chop\n2. Toss\n**Ingredients**\n- lettuce";
        let parsed = parse_completion(text);

        assert_eq!(parsed.ingredients, vec!["lettuce"]);
        assert_eq!(parsed.instructions, vec!["Chop", "Toss"]);
    }

    #[test]
    fn test_missing_instructions_section() {
        let parsed = parse_completion("**Toast**\n**Ingredients**\n- bread\n- butter\n");
        assert_eq!(parsed.ingredients, vec!["bread", "butter"]);
        assert!(parsed.instructions.is_empty());
    }

    #[test]
    fn test_label_as_last_segment_captures_nothing() {
        let parsed = parse_completion("**Toast**\n**Ingredients**");
        assert!(parsed.ingredients.is_empty());
    }

    #[test]
    fn test_first_label_wins() {
        let text = "**Stew**\n**Ingredients**\n- beef\n**More ingredients**\n- carrot";
        let parsed = parse_completion(text);
        assert_eq!(parsed.ingredients, vec!["beef"]);
    }

    #[test]
    fn test_blank_lines_and_indentation_dropped() {
        let text = "**Rice**\n**Ingredients**\n\n  - rice  \n   \n-water\n**Instructions**\n\n 1.  Rinse \n\n2) Boil";
        let parsed = parse_completion(text);

        assert_eq!(parsed.ingredients, vec!["rice", "water"]);
        assert_eq!(parsed.instructions, vec!["Rinse", "Boil"]);
    }

    #[test]
    fn test_only_one_bullet_is_stripped() {
        assert_eq!(strip_bullet("- -1 tsp salt"), "-1 tsp salt");
        assert_eq!(strip_bullet("• pepper"), "pepper");
        assert_eq!(strip_bullet("oil"), "oil");
    }

    #[test]
    fn test_enumeration_requires_separator() {
        assert_eq!(strip_enumeration("10. Serve"), "Serve");
        assert_eq!(strip_enumeration("350F oven"), "350F oven");
        assert_eq!(strip_enumeration("Step one"), "Step one");
        assert_eq!(strip_enumeration("2."), "");
    }

    #[test]
    fn test_unlabelled_body_is_ignored() {
        let parsed = parse_completion("**Mystery Dish**\nCook it well.");
        assert_eq!(parsed.title, "Mystery Dish");
        assert!(parsed.ingredients.is_empty());
        assert!(parsed.instructions.is_empty());
    }

    #[test]
    fn test_into_recipe_starts_unfavorited() {
        let recipe = parse_completion("**Soup**").into_recipe(RecipeId(42));
        assert_eq!(recipe.id, RecipeId(42));
        assert_eq!(recipe.title, "Soup");
        assert!(!recipe.is_favorite);
    }
}
