use super::*;

#[test]
fn video_models_always_cover() {
    let p = RenderFitPolicy::default();
    for (snap, refs) in [(false, false), (true, false), (true, true), (false, true)] {
        assert_eq!(p.decide(ModelKind::VideoFast, snap, refs), RenderFit::Cover);
        assert_eq!(p.decide(ModelKind::VideoHq, snap, refs), RenderFit::Cover);
    }
}

#[test]
fn snapshot_with_references_fills() {
    let p = RenderFitPolicy::default();
    assert_eq!(p.decide(ModelKind::FlashImage, true, true), RenderFit::Fill);
    assert_eq!(p.decide(ModelKind::ProImage, true, true), RenderFit::Fill);
}

#[test]
fn snapshot_only_depends_on_family() {
    let p = RenderFitPolicy::default();
    assert_eq!(p.decide(ModelKind::FlashImage, true, false), RenderFit::Fill);
    assert_eq!(p.decide(ModelKind::ProImage, true, false), RenderFit::Cover);
}

#[test]
fn without_snapshot_covers() {
    let p = RenderFitPolicy::default();
    assert_eq!(p.decide(ModelKind::FlashImage, false, true), RenderFit::Cover);
    assert_eq!(p.decide(ModelKind::ProImage, false, false), RenderFit::Cover);
}

#[test]
fn overrides_take_effect() {
    let p: RenderFitPolicy =
        serde_json::from_str(r#"{"edit_by_family":{"pro":"fill"},"video":"fill"}"#).unwrap();
    assert_eq!(p.decide(ModelKind::ProImage, true, false), RenderFit::Fill);
    assert_eq!(p.decide(ModelKind::VideoFast, false, false), RenderFit::Fill);
    assert_eq!(p.edit_by_family.flash, RenderFit::Fill);
    assert_eq!(p.upload, RenderFit::Fill);
}
