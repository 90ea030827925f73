//! Polygon rasterization.
//!
//! The polygon opcodes hand the video layer a segment, an offset, a
//! screen position, a zoom factor, and a color. The record at the offset
//! is either a single polygon or a hierarchy of child records indexed by
//! further offsets into the same segment. Filling walks two vertex chains
//! that meet at the top and bottom of the shape, interpolating the span
//! edges in 16.16 fixed point. The exact rounding — the reciprocal table,
//! the `<< 2` step scale, and the 0x7FFF/0x8000 fraction seeds — is what
//! the original renderer did, and the shipped shapes depend on it.

use log::warn;

use super::{PAGE_PITCH, Point, SCREEN_H, SCREEN_W, Video};

/// Most vertices a polygon record may carry.
pub const MAX_VERTICES: usize = 50;

/// Color triggering the blend line mode.
const COLOR_BLEND: u8 = 0x10;

/// Record tag selecting a child hierarchy.
const SHAPE_HIERARCHY: u8 = 0x02;

/// Hierarchy recursion bound; shipped data stays in single digits.
const MAX_DEPTH: u8 = 64;

/// `0x4000 / dy` for each span height, with the zero entry saturated so
/// degenerate horizontal edges step a full scanline's worth at once.
const RECIPROCAL: [u16; 1024] = {
    let mut table = [0u16; 1024];
    table[0] = 0x4000;
    let mut i = 1;
    while i < 1024 {
        table[i] = (0x4000 / i) as u16;
        i += 1;
    }
    table
};

/// A parsed flat polygon: bounding box plus up to [`MAX_VERTICES`]
/// zoom-scaled vertices.
struct Polygon {
    bbw: u16,
    bbh: u16,
    count: usize,
    points: [Point; MAX_VERTICES],
}

/// Forward reader over a polygon segment.
struct SegCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl SegCursor<'_> {
    fn fetch_byte(&mut self) -> u8 {
        let b = self.data.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        b
    }

    fn fetch_word(&mut self) -> u16 {
        (self.fetch_byte() as u16) << 8 | self.fetch_byte() as u16
    }
}

impl Video {
    /// Draw the record at `offset` in `segment`. `color` above 0x7F lets
    /// the record supply its own color.
    pub fn draw_shape(
        &mut self,
        segment: &[u8],
        offset: usize,
        color: u8,
        zoom: u16,
        pos: Point,
    ) {
        self.draw_shape_at_depth(segment, offset, color, zoom, pos, 0);
    }

    fn draw_shape_at_depth(
        &mut self,
        segment: &[u8],
        offset: usize,
        mut color: u8,
        zoom: u16,
        pos: Point,
        depth: u8,
    ) {
        let mut cursor = SegCursor { data: segment, pos: offset };
        let tag = cursor.fetch_byte();

        if tag >= 0xC0 {
            if color & 0x80 != 0 {
                color = tag & 0x3F;
            }
            if let Some(polygon) = read_polygon(&mut cursor, zoom) {
                self.fill_polygon(&polygon, color, pos);
            }
            return;
        }

        match tag & 0x3F {
            SHAPE_HIERARCHY => self.draw_hierarchy(segment, cursor, zoom, pos, depth),
            other => warn!(target: "video", "draw_shape: bad record tag 0x{other:02X}"),
        }
    }

    /// A hierarchy record: a parent offset correction followed by child
    /// records addressed by word offsets within the same segment.
    fn draw_hierarchy(
        &mut self,
        segment: &[u8],
        mut cursor: SegCursor<'_>,
        zoom: u16,
        pos: Point,
        depth: u8,
    ) {
        if depth >= MAX_DEPTH {
            warn!(target: "video", "draw_shape: hierarchy too deep");
            return;
        }

        let parent = Point {
            x: pos.x - scale(cursor.fetch_byte(), zoom),
            y: pos.y - scale(cursor.fetch_byte(), zoom),
        };
        let children = cursor.fetch_byte() as usize + 1;

        for _ in 0..children {
            let mut child_offset = cursor.fetch_word();
            let child_pos = Point {
                x: parent.x + scale(cursor.fetch_byte(), zoom),
                y: parent.y + scale(cursor.fetch_byte(), zoom),
            };

            let mut color = 0xFF;
            if child_offset & 0x8000 != 0 {
                // The color word spends its high byte on the color; the
                // low byte is padding.
                color = (cursor.fetch_word() >> 8) as u8 & 0x7F;
                child_offset &= 0x7FFF;
            }

            self.draw_shape_at_depth(
                segment,
                child_offset as usize * 2,
                color,
                zoom,
                child_pos,
                depth + 1,
            );
        }
    }

    /// Scanline-fill a polygon around its bounding-box center.
    fn fill_polygon(&mut self, polygon: &Polygon, color: u8, pos: Point) {
        if polygon.count == 0 {
            return;
        }
        if polygon.count == 4 && polygon.bbw == 0 && polygon.bbh <= 1 {
            self.draw_point(pos.x, pos.y, color);
            return;
        }

        let x1 = pos.x - polygon.bbw as i16 / 2;
        let x2 = pos.x + polygon.bbw as i16 / 2;
        let y1 = pos.y - polygon.bbh as i16 / 2;
        let y2 = pos.y + polygon.bbh as i16 / 2;
        if x1 > 319 || x2 < 0 || y1 > 199 || y2 < 0 {
            return;
        }

        let mut line_y = y1;
        let mut remaining = polygon.count;
        let mut i = 0;
        let mut j = polygon.count - 1;

        // The vertex list starts at the top-right corner and walks
        // clockwise; `i` descends the right side, `j` the left.
        let mut edge_left = ((polygon.points[j].x + x1) as u16 as u32) << 16;
        let mut edge_right = ((polygon.points[i].x + x1) as u16 as u32) << 16;
        i += 1;
        j -= 1;

        loop {
            remaining -= 2;
            if remaining == 0 {
                break;
            }

            let (step_left, _) = edge_step(polygon.points[j + 1], polygon.points[j]);
            let (step_right, dy) = edge_step(polygon.points[i - 1], polygon.points[i]);
            i += 1;
            j -= 1;

            edge_left = edge_left & 0xFFFF_0000 | 0x7FFF;
            edge_right = edge_right & 0xFFFF_0000 | 0x8000;

            if dy == 0 {
                edge_left = edge_left.wrapping_add(step_left as u32);
                edge_right = edge_right.wrapping_add(step_right as u32);
                continue;
            }

            for _ in 0..dy {
                if line_y >= 0 {
                    let span_l = (edge_left >> 16) as i16;
                    let span_r = (edge_right >> 16) as i16;
                    if span_l <= 319 && span_r >= 0 {
                        self.draw_span(
                            span_l.max(0),
                            span_r.min(319),
                            line_y as usize,
                            color,
                        );
                    }
                }
                edge_left = edge_left.wrapping_add(step_left as u32);
                edge_right = edge_right.wrapping_add(step_right as u32);
                line_y += 1;
                if line_y > 199 {
                    return;
                }
            }
        }
    }

    /// Paint one horizontal span on the work page. `x1..=x2` must already
    /// be clipped; the color picks the mode: below 0x10 solid, exactly
    /// 0x10 a blend that sets the palette's transparency bit, above 0x10
    /// a copy of the same span from page 0.
    fn draw_span(&mut self, x1: i16, x2: i16, y: usize, color: u8) {
        if color < COLOR_BLEND {
            self.draw_span_solid(x1, x2, y, color);
        } else if color > COLOR_BLEND {
            self.draw_span_from_background(x1, x2, y);
        } else {
            self.draw_span_blend(x1, x2, y);
        }
    }

    fn span_bounds(x1: i16, x2: i16, y: usize) -> (usize, usize, bool, bool) {
        let (xmin, xmax) = (x1.min(x2) as usize, x1.max(x2) as usize);
        let start = y * PAGE_PITCH + xmin / 2;
        let mut width = xmax / 2 - xmin / 2 + 1;
        let odd_left = xmin & 1 != 0;
        let even_right = xmax & 1 == 0;
        if odd_left {
            width -= 1;
        }
        if even_right {
            width -= 1;
        }
        (start, width, odd_left, even_right)
    }

    fn draw_span_solid(&mut self, x1: i16, x2: i16, y: usize, color: u8) {
        let (mut p, width, odd_left, even_right) = Self::span_bounds(x1, x2, y);
        let page = &mut self.pages[self.work_page];
        let colb = color << 4 | color & 0x0F;
        if odd_left {
            page[p] = page[p] & 0xF0 | colb & 0x0F;
            p += 1;
        }
        page[p..p + width].fill(colb);
        p += width;
        if even_right {
            page[p] = page[p] & 0x0F | colb & 0xF0;
        }
    }

    fn draw_span_blend(&mut self, x1: i16, x2: i16, y: usize) {
        let (mut p, width, odd_left, even_right) = Self::span_bounds(x1, x2, y);
        let page = &mut self.pages[self.work_page];
        if odd_left {
            page[p] = page[p] & 0xF7 | 0x08;
            p += 1;
        }
        for byte in &mut page[p..p + width] {
            *byte = *byte & 0x77 | 0x88;
        }
        p += width;
        if even_right {
            page[p] = page[p] & 0x7F | 0x80;
        }
    }

    fn draw_span_from_background(&mut self, x1: i16, x2: i16, y: usize) {
        if self.work_page == 0 {
            return;
        }
        let (mut p, width, odd_left, even_right) = Self::span_bounds(x1, x2, y);
        let (background, page) = self.two_pages(0, self.work_page);
        if odd_left {
            page[p] = page[p] & 0xF0 | background[p] & 0x0F;
            p += 1;
        }
        page[p..p + width].copy_from_slice(&background[p..p + width]);
        p += width;
        if even_right {
            page[p] = page[p] & 0x0F | background[p] & 0xF0;
        }
    }

    /// Single-pixel polygon degenerate case.
    fn draw_point(&mut self, x: i16, y: i16, color: u8) {
        if !(0..SCREEN_W as i16).contains(&x) || !(0..SCREEN_H as i16).contains(&y) {
            return;
        }
        let offset = y as usize * PAGE_PITCH + x as usize / 2;
        let high = x & 1 == 0;

        let src = if color > COLOR_BLEND {
            self.pages[0][offset]
        } else {
            0
        };
        let page = &mut self.pages[self.work_page];
        let byte = &mut page[offset];
        if color < COLOR_BLEND {
            *byte = if high {
                *byte & 0x0F | color << 4
            } else {
                *byte & 0xF0 | color & 0x0F
            };
        } else if color > COLOR_BLEND {
            *byte = if high {
                *byte & 0x0F | src & 0xF0
            } else {
                *byte & 0xF0 | src & 0x0F
            };
        } else {
            *byte |= if high { 0x80 } else { 0x08 };
        }
    }
}

/// Fixed-point x step for one edge, and the edge's height in scanlines.
fn edge_step(p1: Point, p2: Point) -> (i32, u16) {
    let dy = (p2.y - p1.y) as u16;
    let reciprocal = RECIPROCAL[(dy as usize).min(RECIPROCAL.len() - 1)];
    let step = ((p2.x - p1.x) as i32 * reciprocal as i32) << 2;
    (step, dy)
}

fn scale(value: u8, zoom: u16) -> i16 {
    (value as u32 * zoom as u32 / 64) as i16
}

/// Parse a flat polygon record, scaling coordinates by the zoom factor.
/// Oversized vertex lists are clamped; odd counts are rejected.
fn read_polygon(cursor: &mut SegCursor<'_>, zoom: u16) -> Option<Polygon> {
    let bbw = (cursor.fetch_byte() as u32 * zoom as u32 / 64) as u16;
    let bbh = (cursor.fetch_byte() as u32 * zoom as u32 / 64) as u16;
    let raw_count = cursor.fetch_byte() as usize;

    if raw_count & 1 != 0 {
        warn!(target: "video", "polygon with odd vertex count {raw_count}");
        return None;
    }
    let count = if raw_count > MAX_VERTICES {
        warn!(target: "video", "polygon with {raw_count} vertices clamped to {MAX_VERTICES}");
        MAX_VERTICES
    } else {
        raw_count
    };

    let mut points = [Point::default(); MAX_VERTICES];
    for point in points.iter_mut().take(raw_count) {
        *point = Point {
            x: scale(cursor.fetch_byte(), zoom),
            y: scale(cursor.fetch_byte(), zoom),
        };
    }
    Some(Polygon { bbw, bbh, count, points })
}
