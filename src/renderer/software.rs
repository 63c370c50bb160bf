//! ---------------------------------------------------------------------------
//! CPU rasteriser for the top-down view.
//!
//! * Fills a `Vec<u32>` frame-buffer in **0x00RRGGBB** format.
//! * Primitives arrive back-to-front (painter's order), so no depth buffer.
//! * Every primitive is clipped to the frame; callers may pass anything.
//! ---------------------------------------------------------------------------

use crate::renderer::{DrawCall, Renderer, Rgba};

/// Background clear colour (asphalt).
pub const CLEAR: Rgba = 0x00_20_20_20;

#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }
        self.scratch.fill(CLEAR);
    }

    fn draw(&mut self, call: &DrawCall) {
        match *call {
            DrawCall::Rect { x, y, w, h, colour } => self.fill_rect(x, y, w, h, colour),
            DrawCall::Disc { cx, cy, r, colour } => self.fill_disc(cx, cy, r, colour),
            DrawCall::Line {
                x0,
                y0,
                x1,
                y1,
                colour,
            } => self.line(x0, y0, x1, y1, colour),
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────── primitives ─────────────────────────────────*/
impl Software {
    #[inline]
    fn put(&mut self, x: i32, y: i32, colour: Rgba) {
        if (0..self.width as i32).contains(&x) && (0..self.height as i32).contains(&y) {
            self.scratch[y as usize * self.width + x as usize] = colour;
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, colour: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(self.width as i32);
        let y1 = y.saturating_add(h).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for row in y0..y1 {
            let start = row as usize * self.width;
            self.scratch[start + x0 as usize..start + x1 as usize].fill(colour);
        }
    }

    fn fill_disc(&mut self, cx: i32, cy: i32, r: i32, colour: Rgba) {
        if r <= 0 {
            self.put(cx, cy, colour);
            return;
        }
        let r2 = r * r;
        for dy in -r..=r {
            // half-width of this scan-line
            let half = ((r2 - dy * dy) as f32).sqrt() as i32;
            self.fill_rect(cx - half, cy + dy, 2 * half + 1, 1, colour);
        }
    }

    /// Integer Bresenham.
    fn line(&mut self, mut x0: i32, mut y0: i32, x1: i32, y1: i32, colour: Rgba) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x0, y0, colour);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RendererExt;

    const RED: Rgba = 0x00_FF_00_00;

    fn render(w: usize, h: usize, calls: &[DrawCall]) -> Vec<Rgba> {
        let mut sw = Software::default();
        let mut out = Vec::new();
        sw.draw_frame(w, h, calls, |fb, fw, fh| {
            assert_eq!((fw, fh), (w, h));
            out = fb.to_vec();
        });
        out
    }

    #[test]
    fn clear_fills_whole_frame() {
        let fb = render(8, 4, &[]);
        assert_eq!(fb.len(), 32);
        assert!(fb.iter().all(|&p| p == CLEAR));
    }

    #[test]
    fn rect_is_clipped_to_the_frame() {
        let fb = render(
            4,
            4,
            &[DrawCall::Rect {
                x: -2,
                y: 2,
                w: 4,
                h: 10,
                colour: RED,
            }],
        );
        let painted: Vec<usize> = (0..16).filter(|&i| fb[i] == RED).collect();
        // columns 0..2 of rows 2..4
        assert_eq!(painted, vec![8, 9, 12, 13]);
    }

    #[test]
    fn disc_is_symmetric_and_bounded() {
        let fb = render(
            9,
            9,
            &[DrawCall::Disc {
                cx: 4,
                cy: 4,
                r: 2,
                colour: RED,
            }],
        );
        let at = |x: usize, y: usize| fb[y * 9 + x] == RED;
        assert!(at(4, 4) && at(2, 4) && at(6, 4) && at(4, 2) && at(4, 6));
        assert!(!at(1, 4) && !at(7, 4) && !at(2, 2));
    }

    #[test]
    fn line_covers_both_endpoints_even_off_screen() {
        let fb = render(
            5,
            5,
            &[DrawCall::Line {
                x0: 0,
                y0: 0,
                x1: 8,
                y1: 8,
                colour: RED,
            }],
        );
        for i in 0..5 {
            assert_eq!(fb[i * 5 + i], RED);
        }
        assert_eq!(fb.iter().filter(|&&p| p == RED).count(), 5);
    }

    #[test]
    fn resize_reallocates_the_buffer() {
        let mut sw = Software::default();
        sw.begin_frame(2, 2);
        sw.begin_frame(3, 5);
        let mut len = 0;
        sw.end_frame(|fb, _, _| len = fb.len());
        assert_eq!(len, 15);
    }
}
