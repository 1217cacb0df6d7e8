use super::*;
use crate::foundation::core::Size;
use crate::render::surface::RecordingSurface;

fn session() -> EditorSession {
    EditorSession::with_fonts(EditorConfig::default(), FontBook::empty()).unwrap()
}

fn headlines(s: &EditorSession) -> Vec<String> {
    s.document()
        .slides
        .iter()
        .map(|sl| sl.text.headline.clone())
        .collect()
}

#[test]
fn starts_empty_with_initial_snapshot() {
    let s = session();
    assert!(s.document().is_empty());
    assert_eq!(s.history().len(), 1);
    assert!(!s.can_undo());
    assert!(!s.can_redo());
}

#[test]
fn undo_reverts_to_pre_mutation_state_and_redo_reapplies() {
    let mut s = session();
    s.add_slide().unwrap();
    s.set_text(TextField::Headline, "First").unwrap();
    s.set_text(TextField::Headline, "Second").unwrap();
    assert!(s.can_undo());

    assert!(s.undo());
    assert_eq!(headlines(&s), ["First"]);
    assert!(s.undo());
    assert_eq!(headlines(&s), ["New Slide"]);
    assert!(s.undo());
    assert!(s.document().is_empty());
    assert!(!s.undo());

    assert!(s.redo());
    assert!(s.redo());
    assert!(s.redo());
    assert_eq!(headlines(&s), ["Second"]);
    assert!(!s.redo());
}

#[test]
fn undo_then_redo_is_identity() {
    let mut s = session();
    s.add_slide().unwrap();
    s.add_slide().unwrap();
    s.set_layout(Layout::Top).unwrap();
    let before = s.document().clone();

    s.undo();
    s.redo();
    assert_eq!(s.document(), &before);
}

#[test]
fn new_mutation_discards_redo_branch() {
    let mut s = session();
    s.add_slide().unwrap();
    s.set_text(TextField::Cta, "A").unwrap();
    s.undo();
    assert!(s.can_redo());

    s.set_text(TextField::Cta, "B").unwrap();
    assert!(!s.can_redo());
    assert!(!s.redo());
    assert_eq!(s.document().slides[0].text.cta, "B");
}

#[test]
fn rejected_mutation_leaves_document_and_history_alone() {
    let cfg = EditorConfig::default().with_max_slides(2);
    let mut s = EditorSession::with_fonts(cfg, FontBook::empty()).unwrap();
    s.add_slide().unwrap();
    s.add_slide().unwrap();
    let doc = s.document().clone();
    let depth = s.history().len();

    assert!(matches!(s.add_slide(), Err(CarouselError::Capacity { max: 2 })));
    assert!(s.set_custom_dimensions(0, 0).is_err());
    assert_eq!(s.document(), &doc);
    assert_eq!(s.history().len(), depth);
}

#[test]
fn history_stays_bounded() {
    let cfg = EditorConfig::default().with_history_capacity(5);
    let mut s = EditorSession::with_fonts(cfg, FontBook::empty()).unwrap();
    s.add_slide().unwrap();
    for i in 0..20 {
        s.set_text(TextField::Headline, format!("v{i}")).unwrap();
    }
    assert!(s.history().len() <= 5);
    let mut steps = 0;
    while s.undo() {
        steps += 1;
        assert!(steps < 10);
    }
    assert_eq!(headlines(&s), ["v15"]);
}

#[test]
fn navigation_does_not_record_history() {
    let mut s = session();
    s.add_slide().unwrap();
    s.add_slide().unwrap();
    let depth = s.history().len();
    s.previous_slide();
    assert_eq!(s.document().current_index, 0);
    s.next_slide();
    s.next_slide();
    assert_eq!(s.document().current_index, 0);
    assert!(s.select_slide(9).is_err());
    assert_eq!(s.history().len(), depth);
}

#[test]
fn apply_commands_replace_and_append() {
    let mut s = session();
    s.add_slide().unwrap();

    let out = s
        .apply_commands("## SLIDE\ntitle: A\n## SLIDE\ntitle: B", ApplyMode::Replace)
        .unwrap();
    assert_eq!(out.added, 2);
    assert_eq!(headlines(&s), ["A", "B"]);
    assert_eq!(s.document().current_index, 0);

    let out = s
        .apply_commands("## SLIDE\ntitle: C\nfontsize-title: 90", ApplyMode::Append)
        .unwrap();
    assert_eq!(out.added, 1);
    assert_eq!(out.overrides, 1);
    assert_eq!(headlines(&s), ["A", "B", "C"]);
    assert_eq!(s.document().current_index, 2);
    assert_eq!(s.style().typography.headline.size, 90.0);

    let mut ids: Vec<_> = s.document().slides.iter().map(|sl| sl.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 3);

    assert!(s.undo());
    assert_eq!(headlines(&s), ["A", "B"]);
}

#[test]
fn apply_commands_without_markers_is_rejected() {
    let mut s = session();
    s.add_slide().unwrap();
    let doc = s.document().clone();
    assert!(matches!(
        s.apply_commands("title: nope", ApplyMode::Replace),
        Err(CarouselError::Validation(_))
    ));
    assert_eq!(s.document(), &doc);
}

#[test]
fn append_stops_at_cap() {
    let cfg = EditorConfig::default().with_max_slides(3);
    let mut s = EditorSession::with_fonts(cfg, FontBook::empty()).unwrap();
    s.add_slide().unwrap();
    s.add_slide().unwrap();
    let out = s
        .apply_commands("## SLIDE\n## SLIDE\n## SLIDE", ApplyMode::Append)
        .unwrap();
    assert_eq!((out.added, out.dropped), (1, 2));
    assert_eq!(s.document().len(), 3);
    assert!(matches!(
        s.apply_commands("## SLIDE", ApplyMode::Append),
        Err(CarouselError::Capacity { .. })
    ));
}

#[test]
fn expired_share_is_refused() {
    let mut s = session();
    s.add_slide().unwrap();
    let before = s.document().clone();

    let mut donor = session();
    donor.add_slide().unwrap();
    donor.add_slide().unwrap();
    let mut payload = donor.share_payload();
    payload.expires = now_millis() - 1_000;

    assert!(matches!(
        s.load_shared(payload),
        Err(CarouselError::Expired { .. })
    ));
    assert_eq!(s.document(), &before);
}

#[test]
fn share_token_roundtrip_selects_first_slide() {
    let mut donor = session();
    donor.add_slide().unwrap();
    donor.add_slide().unwrap();
    donor.set_text(TextField::Headline, "shared").unwrap();
    let token = donor.encode_share_token().unwrap();

    let mut s = session();
    s.load_share_token(&token).unwrap();
    assert_eq!(s.document().len(), 2);
    assert_eq!(s.document().current_index, 0);
    assert_eq!(s.document().slides[1].text.headline, "shared");
    assert!(s.load_share_token("%%%").is_err());
}

#[test]
fn stale_autosave_is_ignored() {
    let mut donor = session();
    donor.add_slide().unwrap();
    let mut file = donor.document_file();

    let mut s = session();
    file.timestamp = Some(now_millis() - 2 * s.config().autosave_max_age_ms);
    assert!(!s.restore_autosave(&file.to_json().unwrap()).unwrap());
    assert!(s.document().is_empty());

    file.timestamp = Some(now_millis());
    assert!(s.restore_autosave(&file.to_json().unwrap()).unwrap());
    assert_eq!(s.document().len(), 1);
}

#[test]
fn deleting_last_slide_renders_empty_state() {
    let mut s = session();
    s.add_slide().unwrap();
    s.delete_slide(0).unwrap();
    assert_eq!(s.document().len(), 0);
    assert_eq!(s.document().current_index, 0);

    let mut surface = RecordingSurface::new(Size {
        width: 1080,
        height: 1080,
    });
    s.render_current_into(&mut surface);
    assert_eq!(
        surface.texts(),
        [
            "Create Your First Slide",
            "Use the command box or add a slide to get started"
        ]
    );

    let (frame, _) = s.render_current().unwrap();
    assert_eq!((frame.width, frame.height), (1080, 1080));
    assert_eq!(frame.pixel(5, 5), Some(Rgba8::rgb(0xf8, 0xfa, 0xfc)));
}

#[test]
fn render_ticket_goes_stale_after_edits_and_navigation() {
    let mut s = session();
    s.add_slide().unwrap();
    s.add_slide().unwrap();
    let ticket = s.render_ticket();
    assert!(s.is_ticket_current(&ticket));

    s.previous_slide();
    assert!(!s.is_ticket_current(&ticket));

    let ticket = s.render_ticket();
    s.set_text(TextField::Subtext, "changed").unwrap();
    assert!(!s.is_ticket_current(&ticket));
}

#[test]
fn export_does_not_touch_document_or_history() {
    let mut s = session();
    s.set_custom_dimensions(64, 48).unwrap();
    s.add_slide().unwrap();
    s.add_slide().unwrap();
    let doc = s.document().clone();
    let depth = s.history().len();

    let report = s.export_all(ExportFormat::Png).unwrap();
    assert_eq!(report.pages, 2);
    let single = s.export_current(ExportFormat::Jpeg).unwrap();
    assert_eq!(single.artifact.name, "slide-2-instagram.jpg");

    assert_eq!(s.document(), &doc);
    assert_eq!(s.history().len(), depth);
}
