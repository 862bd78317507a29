//! Planar 4:2:0 frames as produced by the H.264 decoder
//!
//! Layout (I420): full resolution luma plane, then the U plane, then the V
//! plane, each at half width and half height. All planes are row-major and
//! tightly packed.

/// Errors when wrapping decoder output or allocating frame storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Width or height is zero
    ZeroDimensions,
    /// Width or height is odd; chroma planes cannot be subsampled
    OddDimensions,
    /// A plane or destination is shorter than the dimensions require
    BufferTooSmall,
    /// Dimensions differ from the frame storage they are rendered into
    DimensionMismatch,
    /// Frame storage could not be allocated
    OutOfMemory,
}

/// Borrowed view of one decoded 4:2:0 frame
///
/// The planes usually live in storage owned by the decoder, which may reuse
/// it on the next decode call. The borrow keeps the frame from outliving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Yuv420Frame<'a> {
    width: u16,
    height: u16,
    y: &'a [u8],
    u: &'a [u8],
    v: &'a [u8],
}

impl<'a> Yuv420Frame<'a> {
    /// Size in bytes of an I420 buffer for the given dimensions
    pub const fn i420_len(width: u16, height: u16) -> usize {
        let luma = width as usize * height as usize;
        luma + luma / 2
    }

    pub(crate) fn check_dimensions(width: u16, height: u16) -> Result<(), FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::ZeroDimensions);
        }
        if width % 2 != 0 || height % 2 != 0 {
            return Err(FrameError::OddDimensions);
        }
        Ok(())
    }

    /// Wrap a contiguous I420 buffer
    ///
    /// Trailing bytes beyond the three planes are ignored.
    pub fn from_i420(width: u16, height: u16, data: &'a [u8]) -> Result<Self, FrameError> {
        Self::check_dimensions(width, height)?;
        if data.len() < Self::i420_len(width, height) {
            return Err(FrameError::BufferTooSmall);
        }

        let luma_len = width as usize * height as usize;
        let chroma_len = luma_len / 4;
        let (y, rest) = data.split_at(luma_len);
        let (u, rest) = rest.split_at(chroma_len);
        let v = &rest[..chroma_len];

        Ok(Self {
            width,
            height,
            y,
            u,
            v,
        })
    }

    /// Wrap three separate planes
    pub fn from_planes(
        width: u16,
        height: u16,
        y: &'a [u8],
        u: &'a [u8],
        v: &'a [u8],
    ) -> Result<Self, FrameError> {
        Self::check_dimensions(width, height)?;
        let luma_len = width as usize * height as usize;
        let chroma_len = luma_len / 4;
        if y.len() < luma_len || u.len() < chroma_len || v.len() < chroma_len {
            return Err(FrameError::BufferTooSmall);
        }

        Ok(Self {
            width,
            height,
            y: &y[..luma_len],
            u: &u[..chroma_len],
            v: &v[..chroma_len],
        })
    }

    /// Frame width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// (width, height) in pixels
    pub fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Luma plane, `width * height` bytes
    pub fn y_plane(&self) -> &'a [u8] {
        self.y
    }

    /// Blue-difference chroma plane, `width/2 * height/2` bytes
    pub fn u_plane(&self) -> &'a [u8] {
        self.u
    }

    /// Red-difference chroma plane, `width/2 * height/2` bytes
    pub fn v_plane(&self) -> &'a [u8] {
        self.v
    }
}
