//! Rendering abstraction layer.
//!
//! *Game code never touches a pixel buffer directly.*  [`scene::compose`]
//! turns a session into a back-to-front list of [`DrawCall`]s and hands
//! them to a type that implements [`Renderer`].

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// One flat primitive in screen pixels.  Anything off-screen is clipped by
/// the back-end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCall {
    Rect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        colour: Rgba,
    },
    Disc {
        cx: i32,
        cy: i32,
        r: i32,
        colour: Rgba,
    },
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        colour: Rgba,
    },
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Rasterise one primitive; later calls paint over earlier ones.
    fn draw(&mut self, call: &DrawCall);

    /// Finish the frame and **loan** the finished buffer to `submit`,
    /// exactly once.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(&mut self, width: usize, height: usize, calls: &[DrawCall], submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        for c in calls {
            self.draw(c);
        }
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod camera;
pub mod scene;
pub mod software;

pub use camera::TopDownCamera;
pub use software::Software;
