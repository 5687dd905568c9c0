use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtractError;
use crate::types::ExtractedRecipe;
use scraper::{Html, Selector};

/// Regex to find JSON-LD script tags (case-insensitive for type attribute)
static JSONLD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("Invalid JSON-LD regex")
});

/// Regex to find og:image meta tag
static OG_IMAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*property\s*=\s*["']og:image["'][^>]*content\s*=\s*["']([^"']+)["'][^>]*/?\s*>"#)
        .expect("Invalid og:image regex")
});

/// Alternative og:image regex (content before property)
static OG_IMAGE_REGEX_ALT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*content\s*=\s*["']([^"']+)["'][^>]*property\s*=\s*["']og:image["'][^>]*/?\s*>"#)
        .expect("Invalid og:image alt regex")
});

/// Regex to find the canonical link tag
static CANONICAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<link[^>]*rel\s*=\s*["']canonical["'][^>]*href\s*=\s*["']([^"']+)["']"#)
        .expect("Invalid canonical regex")
});

/// Extract a recipe from HTML containing JSON-LD structured data.
/// Falls back to microdata extraction for sites without JSON-LD.
///
/// Uses a fast regex-based path for JSON-LD to avoid full DOM parsing.
/// A page that parses but yields zero ingredient lines is rejected with
/// [`ExtractError::NoIngredients`] even when the title and instructions
/// were found: a shopping pipeline with no ingredients has no further use
/// for the page.
pub fn extract_recipe(html: &str, source_url: &str) -> Result<ExtractedRecipe, ExtractError> {
    // Fast path: extract JSON-LD using regex (avoids DOM parsing)
    if let Some(recipe) = extract_jsonld_fast(html, source_url) {
        return finish(recipe);
    }

    // Slow path: full DOM parsing for malformed HTML or microdata-only sites
    let document = Html::parse_document(html);

    if let Ok(recipe) = extract_recipe_from_jsonld(&document, html, source_url) {
        return finish(recipe);
    }

    let recipe = extract_recipe_from_microdata(&document, html, source_url)?;
    finish(recipe)
}

/// Enforce the zero-ingredient edge policy after any extraction method.
fn finish(recipe: ExtractedRecipe) -> Result<ExtractedRecipe, ExtractError> {
    if recipe.ingredients.is_empty() {
        return Err(ExtractError::NoIngredients);
    }
    Ok(recipe)
}

/// Fast JSON-LD extraction using regex to avoid DOM parsing.
/// Returns None if no valid JSON-LD recipe is found.
fn extract_jsonld_fast(html: &str, source_url: &str) -> Option<ExtractedRecipe> {
    for cap in JSONLD_REGEX.captures_iter(html) {
        let json_text = match cap.get(1) {
            Some(m) => m.as_str(),
            None => continue,
        };

        let sanitized = sanitize_json(json_text);
        let json: serde_json::Value = match serde_json::from_str(&sanitized) {
            Ok(v) => v,
            Err(_) => continue, // Try next script tag
        };

        if let Some(recipe) = find_recipe_in_json(&json) {
            if let Ok(mut extracted) = extract_recipe_data(recipe, html, source_url) {
                if extracted.image_url.is_none() {
                    extracted.image_url =
                        extract_og_image(html).map(|u| absolutize(&u, source_url));
                }
                return Some(extracted);
            }
        }
    }
    None
}

/// Extract recipe from JSON-LD script tags via the DOM.
/// Handles edge cases the regex fast path might miss.
fn extract_recipe_from_jsonld(
    document: &Html,
    html: &str,
    source_url: &str,
) -> Result<ExtractedRecipe, ExtractError> {
    let selector = Selector::parse("script[type='application/ld+json']").expect("Invalid selector");

    for element in document.select(&selector) {
        let json_text = element.inner_html();
        let sanitized = sanitize_json(&json_text);

        let json: serde_json::Value = match serde_json::from_str(&sanitized) {
            Ok(v) => v,
            Err(_) => continue, // Try next script tag
        };

        if let Some(recipe) = find_recipe_in_json(&json) {
            let mut extracted = extract_recipe_data(recipe, html, source_url)?;
            if extracted.image_url.is_none() {
                extracted.image_url = extract_og_image(html).map(|u| absolutize(&u, source_url));
            }
            return Ok(extracted);
        }
    }

    Err(ExtractError::NoRecipe)
}

/// Extract recipe from schema.org microdata markup.
/// Fallback for sites that don't use JSON-LD but have microdata attributes.
fn extract_recipe_from_microdata(
    document: &Html,
    html: &str,
    source_url: &str,
) -> Result<ExtractedRecipe, ExtractError> {
    let recipe_selector = Selector::parse(
        r#"[itemtype="http://schema.org/Recipe"], [itemtype="https://schema.org/Recipe"]"#,
    )
    .expect("Invalid selector");

    let recipe_element = document
        .select(&recipe_selector)
        .next()
        .ok_or(ExtractError::NoRecipe)?;

    let name_selector = Selector::parse(r#"[itemprop="name"]"#).expect("Invalid selector");
    let title = recipe_element
        .select(&name_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ExtractError::MissingField("name".to_string()))?;

    let ingredient_selector =
        Selector::parse(r#"[itemprop="recipeIngredient"], [itemprop="ingredients"]"#)
            .expect("Invalid selector");
    let ingredients: Vec<String> = recipe_element
        .select(&ingredient_selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let instruction_selector =
        Selector::parse(r#"[itemprop="recipeInstructions"]"#).expect("Invalid selector");
    let instructions = recipe_element
        .select(&instruction_selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(ExtractedRecipe {
        title,
        ingredients,
        instructions,
        image_url: extract_og_image(html).map(|u| absolutize(&u, source_url)),
        canonical_url: extract_canonical(html).map(|u| absolutize(&u, source_url)),
    })
}

/// Sanitize JSON-LD content to handle common malformed patterns.
/// Some sites include literal newlines/tabs inside JSON strings instead of escaped versions.
fn sanitize_json(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut in_string = false;
    let mut prev_char = '\0';

    for c in json.chars() {
        if c == '"' && prev_char != '\\' {
            in_string = !in_string;
            result.push(c);
        } else if in_string {
            match c {
                '\n' => result.push_str("\\n"),
                '\r' => result.push_str("\\r"),
                '\t' => result.push_str("\\t"),
                // Drop other control characters inside strings
                c if c.is_control() => {}
                _ => result.push(c),
            }
        } else {
            result.push(c);
        }
        prev_char = c;
    }

    result
}

/// Recursively search for a Recipe object in JSON-LD.
/// Handles @graph arrays and nested structures.
fn find_recipe_in_json(json: &serde_json::Value) -> Option<&serde_json::Value> {
    match json {
        serde_json::Value::Object(obj) => {
            if let Some(type_val) = obj.get("@type") {
                let is_recipe = match type_val {
                    serde_json::Value::String(s) => s == "Recipe",
                    serde_json::Value::Array(arr) => arr.iter().any(|v| v == "Recipe"),
                    _ => false,
                };
                if is_recipe {
                    return Some(json);
                }
            }

            if let Some(graph) = obj.get("@graph") {
                if let Some(recipe) = find_recipe_in_json(graph) {
                    return Some(recipe);
                }
            }

            for (_, value) in obj {
                if let Some(recipe) = find_recipe_in_json(value) {
                    return Some(recipe);
                }
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr {
                if let Some(recipe) = find_recipe_in_json(item) {
                    return Some(recipe);
                }
            }
        }
        _ => {}
    }
    None
}

/// Extract recipe data from a JSON-LD Recipe object.
fn extract_recipe_data(
    recipe: &serde_json::Value,
    html: &str,
    source_url: &str,
) -> Result<ExtractedRecipe, ExtractError> {
    let title = recipe
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExtractError::MissingField("name".to_string()))?
        .trim()
        .to_string();

    let ingredients = extract_ingredients(recipe);
    let instructions = extract_instructions(recipe);
    let image_url = extract_image_url(recipe).map(|u| absolutize(&u, source_url));
    let canonical_url = recipe
        .get("url")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .or_else(|| extract_canonical(html))
        .map(|u| absolutize(&u, source_url));

    Ok(ExtractedRecipe {
        title,
        ingredients,
        instructions,
        image_url,
        canonical_url,
    })
}

/// Extract ingredient lines in original recipe order.
fn extract_ingredients(recipe: &serde_json::Value) -> Vec<String> {
    recipe
        .get("recipeIngredient")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Extract instructions from recipeInstructions as a single text blob.
/// Handles plain strings, arrays of strings, HowToStep objects,
/// and HowToSection objects with itemListElement.
fn extract_instructions(recipe: &serde_json::Value) -> String {
    let instructions_raw = match recipe.get("recipeInstructions") {
        Some(v) => v,
        None => return String::new(),
    };

    match instructions_raw {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Array(arr) => {
            let steps: Vec<String> = arr
                .iter()
                .filter_map(|item| {
                    // HowToStep objects
                    if let Some(text) = item.get("text").and_then(|v| v.as_str()) {
                        return Some(text.trim().to_string());
                    }
                    // Plain strings
                    if let Some(s) = item.as_str() {
                        return Some(s.trim().to_string());
                    }
                    // HowToSection with itemListElement
                    if let Some(items) = item.get("itemListElement").and_then(|v| v.as_array()) {
                        let section_steps: Vec<String> = items
                            .iter()
                            .filter_map(|step| step.get("text").and_then(|v| v.as_str()))
                            .map(|s| s.trim().to_string())
                            .collect();
                        if !section_steps.is_empty() {
                            return Some(section_steps.join("\n"));
                        }
                    }
                    None
                })
                .collect();
            steps.join("\n\n")
        }
        _ => String::new(),
    }
}

/// Extract the primary image URL from the recipe's image field.
fn extract_image_url(recipe: &serde_json::Value) -> Option<String> {
    match recipe.get("image")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(arr) => arr.iter().find_map(|item| {
            item.as_str()
                .map(|s| s.to_string())
                .or_else(|| item.get("url").and_then(|v| v.as_str()).map(String::from))
        }),
        serde_json::Value::Object(obj) => {
            obj.get("url").and_then(|v| v.as_str()).map(String::from)
        }
        _ => None,
    }
}

/// Fast og:image extraction using regex.
fn extract_og_image(html: &str) -> Option<String> {
    if let Some(cap) = OG_IMAGE_REGEX.captures(html) {
        return cap.get(1).map(|m| m.as_str().to_string());
    }
    if let Some(cap) = OG_IMAGE_REGEX_ALT.captures(html) {
        return cap.get(1).map(|m| m.as_str().to_string());
    }
    None
}

/// Extract the canonical URL from the page's link tags.
fn extract_canonical(html: &str) -> Option<String> {
    CANONICAL_REGEX
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Resolve a possibly relative URL against the page's source URL.
fn absolutize(candidate: &str, source_url: &str) -> String {
    if candidate.starts_with("http://") || candidate.starts_with("https://") {
        return candidate.to_string();
    }
    reqwest::Url::parse(source_url)
        .ok()
        .and_then(|base| base.join(candidate).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| candidate.to_string())
}
