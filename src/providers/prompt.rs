/// The system prompt used for recipe generation.
///
/// Loaded from `prompt.txt` at compile time so it can be edited without
/// dealing with Rust string syntax.
pub const RECIPE_GENERATOR_PROMPT: &str = include_str!("prompt.txt");

/// Build the user prompt for a generation request.
///
/// Blank preferences fall back to "default" cuisine and "no" dietary
/// restrictions.
pub fn build_user_prompt(ingredients: &str, cuisine: Option<&str>, diet: Option<&str>) -> String {
    let cuisine = non_blank(cuisine).unwrap_or("default");
    let diet = non_blank(diet).unwrap_or("no");

    format!(
        "Generate a recipe using the following ingredients: {}. Include a {} cuisine style and {} dietary restrictions. Just send the recipe, no added fluff words.",
        ingredients.trim(),
        cuisine,
        diet
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_embedded() {
        assert!(RECIPE_GENERATOR_PROMPT.contains("creates recipes"));
        assert!(RECIPE_GENERATOR_PROMPT.contains("ingredients and preferences"));
    }

    #[test]
    fn test_user_prompt_with_preferences() {
        let prompt = build_user_prompt("eggs, spinach", Some("Italian"), Some("Vegetarian"));
        assert!(prompt.contains("ingredients: eggs, spinach."));
        assert!(prompt.contains("Include a Italian cuisine style"));
        assert!(prompt.contains("and Vegetarian dietary restrictions"));
    }

    #[test]
    fn test_user_prompt_defaults_blank_preferences() {
        let prompt = build_user_prompt(" rice ", None, Some("   "));
        assert!(prompt.contains("ingredients: rice."));
        assert!(prompt.contains("default cuisine style"));
        assert!(prompt.contains("no dietary restrictions"));
    }
}
