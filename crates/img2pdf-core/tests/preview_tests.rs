use image::{DynamicImage, ImageFormat as Codec};
use img2pdf_core::*;
use std::io::Cursor;
use std::rc::Rc;

#[test]
fn test_thumbnail_is_bounded() {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::new_rgb8(800, 400)
        .write_to(&mut buf, Codec::Png)
        .unwrap();
    let file = SelectedFile::new("wide.png", ImageFormat::Png, buf.into_inner());

    let thumb = make_thumbnail(0, &file, 160).unwrap();
    assert_eq!((thumb.width, thumb.height), (160, 80));
    assert_eq!(thumb.rgba.len(), 160 * 80 * 4);
}

#[test]
fn test_thumbnail_of_corrupt_file_fails() {
    let file = SelectedFile::new("bad.png", ImageFormat::Png, vec![0; 8]);
    assert!(matches!(
        make_thumbnail(3, &file, 160),
        Err(ConvertError::Decode { index: 3, .. })
    ));
}

#[test]
fn test_handles_released_on_selection_change() {
    let handle = Rc::new(());
    let mut previews = PreviewSet::new();

    let first = SelectionGeneration(1);
    previews.reset(first, 2);
    assert!(previews.insert(first, 0, Rc::clone(&handle)));
    assert!(previews.insert(first, 1, Rc::clone(&handle)));
    assert_eq!(Rc::strong_count(&handle), 3);

    let released = previews.reset(SelectionGeneration(2), 1);
    assert_eq!(released, 2);
    assert_eq!(Rc::strong_count(&handle), 1);
    assert_eq!(previews.len(), 1);
    assert_eq!(previews.live_count(), 0);
}

#[test]
fn test_stale_handles_are_dropped() {
    let handle = Rc::new(());
    let mut previews = PreviewSet::new();
    previews.reset(SelectionGeneration(5), 1);

    assert!(!previews.insert(SelectionGeneration(4), 0, Rc::clone(&handle)));
    assert!(!previews.insert(SelectionGeneration(5), 7, Rc::clone(&handle)));
    assert_eq!(Rc::strong_count(&handle), 1);
    assert!(previews.get(0).is_none());
}

#[test]
fn test_release_drops_everything() {
    let handle = Rc::new(());
    let mut previews = PreviewSet::new();
    let generation = SelectionGeneration(1);
    previews.reset(generation, 3);
    previews.insert(generation, 1, Rc::clone(&handle));

    assert_eq!(previews.release(), 1);
    assert!(previews.is_empty());
    assert_eq!(Rc::strong_count(&handle), 1);
}

#[test]
fn test_failed_slot_is_marked() {
    let handle = Rc::new(());
    let mut previews = PreviewSet::new();
    let generation = SelectionGeneration(1);
    previews.reset(generation, 2);

    assert!(previews.insert(generation, 0, Rc::clone(&handle)));
    assert!(previews.mark_failed(generation, 1));
    assert!(!previews.mark_failed(SelectionGeneration(0), 0));

    let states: Vec<_> = previews
        .slots()
        .map(|slot| match slot {
            PreviewSlot::Pending => "pending",
            PreviewSlot::Ready(_) => "ready",
            PreviewSlot::Failed => "failed",
        })
        .collect();
    assert_eq!(states, ["ready", "failed"]);
    assert_eq!(previews.live_count(), 1);
}
