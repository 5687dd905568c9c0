//! Ingredient normalization prompt: free-text lines to structured line items.

/// Task name used in logs.
pub const INGREDIENTS_TASK_NAME: &str = "instacart_ingredients";

/// Fixed normalization policy for the ingredients task.
pub const INGREDIENTS_SYSTEM_PROMPT: &str = r#"You normalize free-text recipe ingredient lines into structured shopping line items.

For each input line, produce a line item object with:
- name: the core ingredient, cleaned up (e.g. "flour", not "2 cups sifted flour"). Required, never empty.
- quantity: the numeric amount as a number. Default to 1 when the line gives no amount.
- unit: a short unit token (e.g. "cup", "tsp", "lb"). Default to "each" when the line gives no unit.
- display_text: the original line, lightly cleaned, so the shopper recognizes it.
- filters: only when the line clearly names a brand or a dietary constraint, an object with brand_filters and/or health_filters string arrays. Omit the field entirely otherwise.

Rules:
- Preserve every distinct ingredient from the input. Never invent ingredients that are not in the input, and never drop ones that are.
- Keep the output in the same order as the input.
- Quantities must be positive numbers. "1/2 cup" becomes 0.5 with unit "cup".
- Expand abbreviations: "tbsp" -> "tablespoon", "tsp" -> "teaspoon", "lb" -> "pound", "oz" -> "ounce".

Respond with only a JSON object of the form:
{"ingredients": [{"name": "flour", "quantity": 2, "unit": "cup", "display_text": "2 cups flour"}]}"#;

/// Render the user prompt embedding the raw ingredient lines.
pub fn render_ingredients_user_prompt(ingredients: &[String]) -> String {
    let lines = ingredients
        .iter()
        .map(|line| format!("- {}", line))
        .collect::<Vec<_>>()
        .join("\n");

    format!("Input:\n{}", lines)
}
