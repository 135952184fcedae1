/// An owned block of 8-bit pixel data with its dimensions.
///
/// Buffers move between pipeline stages by value; whichever stage consumes
/// one (GPU upload, encode) also frees it, so there is never a question of
/// who owns the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Samples per pixel: 1 = alpha, 2 = luminance+alpha, 3 = RGB, 4 = RGBA.
    pub channels: u8,
}

impl PixelBuffer {
    /// Wraps raw bytes; `data` must hold exactly `width * height * channels`
    /// bytes.
    ///
    /// # Panics
    /// Panics if the byte count does not match the dimensions.
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        // sized in u64 so oversized dimensions fail the comparison
        // instead of wrapping
        assert_eq!(
            data.len() as u64,
            u64::from(width) * u64::from(height) * u64::from(channels),
            "pixel data size does not match {width}x{height}x{channels}"
        );
        Self { data, width, height, channels }
    }

    /// Allocates a zero-filled buffer.
    pub fn alloc(width: u32, height: u32, channels: u8) -> Self {
        let size = (u64::from(width) * u64::from(height) * u64::from(channels)) as usize;
        Self { data: vec![0; size], width, height, channels }
    }

    /// Bytes per scanline.
    pub fn scanline(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Borrows the pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutably borrows the pixel bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the buffer, returning the pixel bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Reverses the scanline order in place.
    ///
    /// The decode/encode libraries and the GPU disagree on which end of the
    /// image row zero is, so nearly every read or write path passes through
    /// here. Uses a single scanline of scratch space so extra memory stays
    /// O(width * channels) regardless of image size; a middle row of an
    /// odd-height image stays put.
    pub fn flip_vertical(&mut self) {
        let scanline = self.scanline();
        if scanline == 0 {
            return;
        }
        let mut scratch = vec![0u8; scanline];
        let height = self.height as usize;
        for y in 0..height / 2 {
            let top = y * scanline;
            let bottom = (height - 1 - y) * scanline;
            scratch.copy_from_slice(&self.data[top..top + scanline]);
            self.data.copy_within(bottom..bottom + scanline, top);
            self.data[bottom..bottom + scanline].copy_from_slice(&scratch);
        }
    }

    /// Copies a sub-rectangle into a new buffer.
    ///
    /// The caller guarantees the rectangle lies within the image; this is
    /// only checked in debug builds.
    pub fn crop(&self, out_width: u32, out_height: u32, offset_x: u32, offset_y: u32) -> Self {
        debug_assert!(offset_x + out_width <= self.width);
        debug_assert!(offset_y + out_height <= self.height);

        let channels = self.channels as usize;
        let scanline = self.scanline();
        let out_scanline = out_width as usize * channels;
        let mut out = Vec::with_capacity(out_scanline * out_height as usize);
        for y in offset_y..offset_y + out_height {
            let start = y as usize * scanline + offset_x as usize * channels;
            out.extend_from_slice(&self.data[start..start + out_scanline]);
        }
        Self::new(out, out_width, out_height, self.channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32, channels: u8) -> PixelBuffer {
        let size = (width * height * u32::from(channels)) as usize;
        let data = (0..size).map(|i| (i % 251) as u8).collect();
        PixelBuffer::new(data, width, height, channels)
    }

    #[test]
    fn flip_is_an_involution_even_height() {
        let original = gradient(5, 4, 3);
        let mut buf = original.clone();
        buf.flip_vertical();
        assert_ne!(buf, original);
        buf.flip_vertical();
        assert_eq!(buf, original);
    }

    #[test]
    fn flip_is_an_involution_odd_height() {
        let original = gradient(4, 7, 4);
        let mut buf = original.clone();
        buf.flip_vertical();
        buf.flip_vertical();
        assert_eq!(buf, original);
    }

    #[test]
    fn flip_leaves_center_row_of_odd_height() {
        let mut buf = gradient(3, 3, 1);
        let center: Vec<u8> = buf.data()[3..6].to_vec();
        buf.flip_vertical();
        assert_eq!(&buf.data()[3..6], center.as_slice());
    }

    #[test]
    fn flip_swaps_rows() {
        let mut buf = PixelBuffer::new(vec![1, 2, 3, 4], 2, 2, 1);
        buf.flip_vertical();
        assert_eq!(buf.data(), &[3, 4, 1, 2]);
    }

    #[test]
    fn crop_full_rectangle_is_identity() {
        let buf = gradient(6, 5, 3);
        let copy = buf.crop(6, 5, 0, 0);
        assert_eq!(copy, buf);
    }

    #[test]
    fn crop_extracts_sub_rectangle() {
        // 1-channel 4x4 with pixel value = y*4 + x
        let data: Vec<u8> = (0..16).collect();
        let buf = PixelBuffer::new(data, 4, 4, 1);
        let sub = buf.crop(2, 2, 1, 1);
        assert_eq!(sub.data(), &[5, 6, 9, 10]);
    }
}
