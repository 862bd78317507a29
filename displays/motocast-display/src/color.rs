//! YUV to RGB565 color-space conversion
//!
//! Integer approximation of BT.601 (studio swing input):
//! ```text
//! c = max(0, Y - 16)    d = U - 128    e = V - 128
//! R = (298c + 409e + 128) >> 8
//! G = (298c - 100d - 208e + 128) >> 8
//! B = (298c + 516d + 128) >> 8
//! ```
//! Each channel is clamped to 0-255 and packed as 5-6-5 bits.

use crate::frame::{FrameError, Yuv420Frame};

/// Chroma contribution shared by the two pixels of a 2x1 block, rounding included
#[derive(Debug, Clone, Copy)]
struct Chroma {
    r: i32,
    g: i32,
    b: i32,
}

impl Chroma {
    #[inline]
    fn new(u: u8, v: u8) -> Self {
        let d = u as i32 - 128;
        let e = v as i32 - 128;
        Self {
            r: 409 * e + 128,
            g: -100 * d - 208 * e + 128,
            b: 516 * d + 128,
        }
    }

    #[inline]
    fn pixel(self, y: u8) -> u16 {
        let c = 298 * (y as i32 - 16).max(0);
        let r = channel(c + self.r);
        let g = channel(c + self.g);
        let b = channel(c + self.b);
        ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3)
    }
}

#[inline]
fn channel(scaled: i32) -> u16 {
    (scaled >> 8).clamp(0, 255) as u16
}

/// Convert a single YUV sample to an RGB565 pixel
#[inline]
pub fn yuv_to_rgb565(y: u8, u: u8, v: u8) -> u16 {
    Chroma::new(u, v).pixel(y)
}

/// Convert a whole 4:2:0 frame into `dst` (row-major RGB565)
///
/// `dst` must hold at least `width * height` pixels.
pub fn yuv420_to_rgb565(frame: &Yuv420Frame<'_>, dst: &mut [u16]) -> Result<(), FrameError> {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    if dst.len() < width * height {
        return Err(FrameError::BufferTooSmall);
    }

    let chroma_width = width / 2;
    let rows = dst
        .chunks_exact_mut(width)
        .zip(frame.y_plane().chunks_exact(width))
        .take(height)
        .enumerate();

    for (row, (out, luma)) in rows {
        let start = (row / 2) * chroma_width;
        let u = &frame.u_plane()[start..start + chroma_width];
        let v = &frame.v_plane()[start..start + chroma_width];

        let pairs = out
            .chunks_exact_mut(2)
            .zip(luma.chunks_exact(2))
            .zip(u.iter().zip(v));
        for ((px, ys), (&u, &v)) in pairs {
            let chroma = Chroma::new(u, v);
            px[0] = chroma.pixel(ys[0]);
            px[1] = chroma.pixel(ys[1]);
        }
    }

    Ok(())
}
