//! Instruction segmentation prompt: one blob to discrete steps.

/// Task name used in logs.
pub const INSTRUCTIONS_TASK_NAME: &str = "instacart_instructions";

/// Fixed segmentation policy for the instructions task.
pub const INSTRUCTIONS_SYSTEM_PROMPT: &str = r#"You segment recipe instructions into an array of string steps.

Rules:
- Each step must be a complete sentence a cook can follow on its own.
- Keep the original order.
- Rephrase only as needed for the step to stand alone. Try to limit guessing beyond what the source text states.

Respond with only a JSON object of the form:
{"instructions": ["Preheat the oven to 450F.", "Mix the dry ingredients."]}"#;

/// Render the user prompt embedding the raw instruction blob.
pub fn render_instructions_user_prompt(instructions: &str) -> String {
    format!("Input:\n{}", instructions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_embeds_the_blob() {
        let prompt = render_instructions_user_prompt("Mix. Bake at 450F.");
        assert!(prompt.contains("Mix. Bake at 450F."));
    }
}
