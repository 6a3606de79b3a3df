use crate::layers::model::RenderFit;
use crate::resolution::{ModelFamily, ModelKind};

/// Render-fit for snapshot edits without references, per image model family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FamilyFit {
    /// The fast model returns pixels matching the input cut.
    pub flash: RenderFit,
    /// The pro model tends to letterbox; cropping removes the bars.
    pub pro: RenderFit,
}

impl Default for FamilyFit {
    fn default() -> Self {
        Self {
            flash: RenderFit::Fill,
            pro: RenderFit::Cover,
        }
    }
}

/// Decision table for the render-fit of newly created layers.
///
/// Backend quirks drift, so every branch is a field that configuration can override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderFitPolicy {
    /// Uploaded or pasted images.
    pub upload: RenderFit,
    /// Any video model result.
    pub video: RenderFit,
    /// Snapshot edit with reference images blended in.
    pub edit_with_references: RenderFit,
    /// Generation from references without a snapshot.
    pub references_only: RenderFit,
    /// Snapshot edit without references.
    pub edit_by_family: FamilyFit,
    /// Pure text-to-image.
    pub text_only: RenderFit,
}

impl Default for RenderFitPolicy {
    fn default() -> Self {
        Self {
            upload: RenderFit::Fill,
            video: RenderFit::Cover,
            edit_with_references: RenderFit::Fill,
            references_only: RenderFit::Cover,
            edit_by_family: FamilyFit::default(),
            text_only: RenderFit::Cover,
        }
    }
}

impl RenderFitPolicy {
    /// Render-fit for a layer produced by `model` from the given inputs.
    pub fn decide(&self, model: ModelKind, has_snapshot: bool, has_references: bool) -> RenderFit {
        if model.is_video() {
            return self.video;
        }
        match (has_snapshot, has_references) {
            (true, true) => self.edit_with_references,
            (true, false) if model.family() == ModelFamily::Pro => self.edit_by_family.pro,
            (true, false) => self.edit_by_family.flash,
            (false, true) => self.references_only,
            (false, false) => self.text_only,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/policy.rs"]
mod tests;
