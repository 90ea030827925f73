//! Page operations: fills, copies, scrolling, page rotation, and the
//! palette pipeline.

use otherworld_core::video::{PAGE_SIZE, Video};

#[test]
fn test_fill_page_paints_both_nibbles() {
    let mut video = Video::new();
    video.fill_page(0x01, 0x03);
    assert!(video.page(1).iter().all(|&b| b == 0x33));
}

#[test]
fn test_fill_page_masks_color_to_nibble() {
    let mut video = Video::new();
    video.fill_page(0x00, 0xF5);
    assert!(video.page(0).iter().all(|&b| b == 0x55));
}

#[test]
fn test_copy_page_to_itself_is_a_no_op() {
    let mut video = Video::new();
    video.fill_page(0x01, 0x07);
    video.copy_page(0x01, 0x01, 0);
    assert!(video.page(1).iter().all(|&b| b == 0x77));
}

#[test]
fn test_copy_page_full() {
    let mut video = Video::new();
    video.fill_page(0x01, 0x05);
    video.copy_page(0x01, 0x02, 0);
    assert!(video.page(2).iter().all(|&b| b == 0x55));
}

#[test]
fn test_copy_page_resolves_front_and_back_sentinels() {
    let mut video = Video::new();

    // Back page (page 1 at reset) copied out through the 0xFF sentinel.
    video.fill_page(0xFF, 0x06);
    video.copy_page(0xFF, 0x00, 0);
    assert!(video.page(0).iter().all(|&b| b == 0x66));

    // Front page (page 2 at reset) through the 0xFE sentinel.
    video.fill_page(0xFE, 0x04);
    video.copy_page(0xFE, 0x03, 0);
    assert!(video.page(3).iter().all(|&b| b == 0x44));
}

#[test]
fn test_copy_page_with_positive_scroll() {
    let mut video = Video::new();
    video.fill_page(0x01, 0x01);
    video.fill_page(0x02, 0x02);

    // Source selector 0x81: page 1 through the scroll path.
    video.copy_page(0x81, 0x02, 3);

    let dst = video.page(2);
    // Rows 0..2 keep the old contents, rows 3.. carry the source.
    assert!(dst[..3 * 160].iter().all(|&b| b == 0x22));
    assert!(dst[3 * 160..].iter().all(|&b| b == 0x11));
}

#[test]
fn test_copy_page_with_negative_scroll() {
    let mut video = Video::new();
    video.fill_page(0x01, 0x01);
    video.fill_page(0x02, 0x02);

    video.copy_page(0x81, 0x02, -5);

    let dst = video.page(2);
    assert!(dst[..195 * 160].iter().all(|&b| b == 0x11));
    assert!(dst[195 * 160..].iter().all(|&b| b == 0x22));
}

#[test]
fn test_copy_page_rejects_out_of_range_scroll() {
    let mut video = Video::new();
    video.fill_page(0x01, 0x01);
    video.fill_page(0x02, 0x02);

    video.copy_page(0x81, 0x02, 200);
    assert!(video.page(2).iter().all(|&b| b == 0x22));
}

#[test]
fn test_copy_preserves_row_parity() {
    // No copy may shift pixels by half a byte: an asymmetric nibble
    // pattern must survive a full-page copy byte-for-byte.
    let mut video = Video::new();
    video.fill_page(0x00, 0x04);
    video.select_work_page(0x00);
    video.draw_string(0x190, 0, 0, 0x0A);

    video.copy_page(0x00, 0x03, 0);
    assert_eq!(&video.page(3)[..PAGE_SIZE], &video.page(0)[..PAGE_SIZE]);
}

#[test]
fn test_show_swaps_front_and_back() {
    let mut video = Video::new();
    let front = video.front_page();
    let back = video.back_page();

    video.show(0xFF);
    assert_eq!(video.front_page(), back);
    assert_eq!(video.back_page(), front);

    video.show(0xFE);
    assert_eq!(video.front_page(), back);

    video.show(0x00);
    assert_eq!(video.front_page(), 0);
}

#[test]
fn test_bad_selector_resolves_to_work_page() {
    let mut video = Video::new();
    video.select_work_page(0x01);
    video.fill_page(0x30, 0x09);
    assert!(video.page(1).iter().all(|&b| b == 0x99));
}

#[test]
fn test_palette_apply_and_render() {
    let mut video = Video::new();

    // Palette 0, color 1 = pure red (0RGB nibbles, big-endian).
    let mut palettes = vec![0u8; 32 * 32];
    palettes[2] = 0x0F;
    palettes[3] = 0x00;

    video.fill_page(0xFE, 0x01);
    video.request_palette(0);
    video.apply_requested_palette(&palettes);

    let mut frame = vec![0u8; 320 * 200 * 3];
    video.render_frame(&mut frame);
    assert_eq!(&frame[..3], &[0xFF, 0x00, 0x00]);
    assert_eq!(&frame[frame.len() - 3..], &[0xFF, 0x00, 0x00]);
}

#[test]
fn test_palette_application_is_idempotent() {
    let mut video = Video::new();
    let mut palettes = vec![0u8; 32 * 32];
    palettes[2] = 0x0F;

    video.fill_page(0xFE, 0x01);
    video.request_palette(0);
    video.apply_requested_palette(&palettes);

    let mut first = vec![0u8; 320 * 200 * 3];
    video.render_frame(&mut first);

    // A second present with no new request must produce identical bytes.
    video.apply_requested_palette(&palettes);
    let mut second = vec![0u8; 320 * 200 * 3];
    video.render_frame(&mut second);
    assert_eq!(first, second);
}

#[test]
fn test_bitmap_blit_decodes_planes_into_page0() {
    let mut video = Video::new();

    // Plane 0 all ones -> every pixel color 1; plane 3 all ones on top
    // -> every pixel color 9.
    let mut planar = vec![0u8; 32_000];
    planar[..8_000].fill(0xFF);
    planar[24_000..].fill(0xFF);

    video.copy_bitmap_to_page0(&planar);
    assert!(video.page(0).iter().all(|&b| b == 0x99));
}
