/// Appended when reference images are blended into a snapshot.
pub const BLEND_REFERENCES_SUFFIX: &str =
    " . Blend the object from the reference image(s) naturally into the scene.";

/// Appended when a snapshot is edited without references.
pub const PRESERVE_GEOMETRY_SUFFIX: &str =
    " . Maintain exact scale, perspective and position of original image elements.";

/// Fixed instruction sent by magic fill.
pub const MAGIC_FILL_PROMPT: &str = "TASK: OUTPAINTING / IMAGE EXTENSION.
INSTRUCTION: The input image contains a valid visual area and an empty (black/transparent) area.
GOAL: Fill ONLY the empty area so the scene extends invisibly and continuously.
STRICT RULES:
1. DO NOT CHANGE the pixels of the visible original image.
2. Keep perfect continuity of lines, lighting, shadows, texture and perspective.
3. If the image is a landscape, extend the landscape. If it is a cropped object, complete the object.
4. The final result must look like a single cohesive image.
5. Blend the borders imperceptibly, avoiding abrupt cuts.";

/// Name given to layers created from the clipboard.
pub const PASTED_LAYER_NAME: &str = "Pasted Image";

const NAME_PROMPT_CHARS: usize = 10;

/// Final prompt for the given inputs.
pub fn augment(prompt: &str, has_snapshot: bool, has_references: bool) -> String {
    match (has_snapshot, has_references) {
        (true, true) => format!("{prompt}{BLEND_REFERENCES_SUFFIX}"),
        (true, false) => format!("{prompt}{PRESERVE_GEOMETRY_SUFFIX}"),
        (false, _) => prompt.to_owned(),
    }
}

/// `Gen {n}: {prompt head}...` for the variation at zero-based `index`.
pub fn generation_layer_name(index: usize, prompt: &str) -> String {
    format!("Gen {}: {}...", index + 1, head(prompt))
}

/// `Video: {prompt head}...`
pub fn video_layer_name(prompt: &str) -> String {
    format!("Video: {}...", head(prompt))
}

fn head(prompt: &str) -> String {
    prompt.chars().take(NAME_PROMPT_CHARS).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/generate/prompt.rs"]
mod tests;
