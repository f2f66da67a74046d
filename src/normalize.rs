//! Maps Spoonacular's verbose payloads onto the client-facing shapes in
//! [`crate::models`]. Every missing upstream field becomes an empty string,
//! an empty list, or `null`; keys are never dropped.

use regex::Regex;
use std::sync::LazyLock;

use crate::{
    models::{ IngredientInfo, IngredientSubstitutes, IngredientSuggestion, RecipeDetail, SearchResultItem },
    services::spoonacular_service::{
        AnalyzedInstruction,
        AutocompleteIngredient,
        IngredientInformation,
        RecipeInformation,
        SubstitutesResponse,
    },
    utils::non_empty,
};

pub const SNIPPET_CHARS: usize = 600;
pub const DEFAULT_SOURCE: &str = "Spoonacular";

static BLOCK_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:<\s*/?\s*(?:br|p|li|ol|ul)\b[^>]*>[ \t]*)+").expect("Invalid block tag regex")
});

static HTML_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[^>]+>").expect("Invalid HTML tag regex")
});

static EXCESS_NEWLINES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n{3,}").expect("Invalid newline regex")
});

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("Invalid whitespace regex")
});

/// Turns an HTML fragment into plain text with line breaks where block tags were.
/// Idempotent.
pub fn strip_html(input: &str) -> String {
    let text = BLOCK_TAG_REGEX.replace_all(input, "\n");
    let text = HTML_TAG_REGEX.replace_all(&text, "");
    let text = EXCESS_NEWLINES_REGEX.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Original site first, then the Spoonacular page.
pub fn primary_url(source_url: Option<String>, spoonacular_source_url: Option<String>) -> String {
    non_empty(source_url).or_else(|| non_empty(spoonacular_source_url)).unwrap_or_default()
}

/// Step texts of the first instruction block that has any.
fn first_steps(blocks: &[AnalyzedInstruction]) -> Option<Vec<String>> {
    blocks
        .iter()
        .map(|block| {
            block.steps
                .iter()
                .flatten()
                .filter_map(|s| non_empty(s.step.clone()))
                .map(|s| s.trim().to_string())
                .collect::<Vec<_>>()
        })
        .find(|steps| !steps.is_empty())
}

/// Single-line preview used on search cards.
pub fn instruction_snippet(info: &RecipeInformation) -> String {
    let raw = match first_steps(info.analyzed_instructions.as_deref().unwrap_or_default()) {
        Some(steps) => steps.join(" "),
        None => info.instructions.clone().unwrap_or_default(),
    };

    let text = HTML_TAG_REGEX.replace_all(&raw, "");
    let text = WHITESPACE_REGEX.replace_all(&text, " ");
    let text = text.trim();

    if text.chars().count() > SNIPPET_CHARS {
        let mut snippet: String = text.chars().take(SNIPPET_CHARS).collect();
        snippet.push('…');
        snippet
    } else {
        text.to_string()
    }
}

pub fn search_result(info: RecipeInformation) -> SearchResultItem {
    let instructions = instruction_snippet(&info);

    let ingredients = info.extended_ingredients
        .unwrap_or_default()
        .into_iter()
        .map(|i| i.name.unwrap_or_default().to_lowercase())
        .collect();

    SearchResultItem {
        id: info.id.unwrap_or_default(),
        title: info.title.unwrap_or_default(),
        url: primary_url(info.source_url, info.spoonacular_source_url),
        image: info.image.unwrap_or_default(),
        source: non_empty(info.source_name).unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        cuisine: info.cuisines
            .unwrap_or_default()
            .into_iter()
            .next()
            .unwrap_or_default(),
        country: String::new(),
        ingredients,
        instructions,
    }
}

pub fn recipe_detail(info: RecipeInformation) -> RecipeDetail {
    let instructions = match first_steps(info.analyzed_instructions.as_deref().unwrap_or_default()) {
        Some(steps) =>
            steps
                .iter()
                .enumerate()
                .map(|(idx, step)| format!("{}. {}", idx + 1, step))
                .collect::<Vec<_>>()
                .join("\n"),
        None => strip_html(info.instructions.as_deref().unwrap_or_default()),
    };

    let ingredients = info.extended_ingredients
        .unwrap_or_default()
        .into_iter()
        .filter_map(|i| non_empty(i.original).or_else(|| non_empty(i.name)))
        .collect();

    RecipeDetail {
        id: info.id.unwrap_or_default(),
        title: info.title.unwrap_or_default(),
        image: info.image.unwrap_or_default(),
        url: primary_url(info.source_url, info.spoonacular_source_url),
        source_name: info.source_name.unwrap_or_default(),
        ready_in_minutes: info.ready_in_minutes.filter(|m| *m > 0),
        servings: info.servings.filter(|s| *s > 0),
        cuisines: info.cuisines.unwrap_or_default(),
        diets: info.diets.unwrap_or_default(),
        summary: strip_html(info.summary.as_deref().unwrap_or_default()),
        ingredients,
        instructions,
    }
}

pub fn ingredient_suggestion(item: AutocompleteIngredient) -> IngredientSuggestion {
    IngredientSuggestion {
        id: item.id.unwrap_or_default(),
        name: item.name.unwrap_or_default(),
        aisle: item.aisle.unwrap_or_default(),
    }
}

/// `image_cdn` is the base the upstream's bare image filenames live under.
pub fn ingredient_info(info: IngredientInformation, image_cdn: &str) -> IngredientInfo {
    let calories = info.nutrition
        .and_then(|n| n.nutrients)
        .unwrap_or_default()
        .into_iter()
        .find(|n| {
            n.name
                .as_deref()
                .map(|name| name.trim().eq_ignore_ascii_case("calories"))
                .unwrap_or(false)
        })
        .and_then(|n| n.amount);

    let image = match non_empty(info.image) {
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => url,
        Some(file) => format!("{}/{}", image_cdn.trim_end_matches('/'), file),
        None => String::new(),
    };

    IngredientInfo {
        id: info.id.unwrap_or_default(),
        name: info.name.unwrap_or_default(),
        aisle: info.aisle.unwrap_or_default(),
        calories,
        image,
        possible_units: info.possible_units.unwrap_or_default(),
    }
}

pub fn substitutes(response: SubstitutesResponse) -> IngredientSubstitutes {
    IngredientSubstitutes {
        substitutes: response.substitutes.unwrap_or_default(),
        message: response.message.unwrap_or_default(),
    }
}
