/// Interleaved RGB8 image produced by a render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Black image of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 3)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let i = self.offset(x, y)?;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Write a pixel; returns false when it lies outside the image
    pub fn put_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                self.data[i..i + 3].copy_from_slice(&color);
                true
            }
            None => false,
        }
    }

    pub fn lit_pixel_count(&self) -> usize {
        self.data
            .chunks_exact(3)
            .filter(|px| px.iter().any(|&c| c != 0))
            .count()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_black() {
        let buffer = RasterBuffer::new(4, 3);
        assert_eq!(buffer.as_bytes().len(), 36);
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(buffer.lit_pixel_count(), 0);
    }

    #[test]
    fn test_put_and_read_pixel() {
        let mut buffer = RasterBuffer::new(4, 3);
        assert!(buffer.put_pixel(3, 2, [1, 2, 3]));
        assert_eq!(buffer.pixel(3, 2), Some([1, 2, 3]));
        assert_eq!(&buffer.as_bytes()[33..36], &[1, 2, 3]);
        assert_eq!(buffer.lit_pixel_count(), 1);
    }

    #[test]
    fn test_out_of_range_pixel() {
        let mut buffer = RasterBuffer::new(4, 3);
        assert!(!buffer.put_pixel(4, 0, [255, 255, 255]));
        assert!(!buffer.put_pixel(0, 3, [255, 255, 255]));
        assert_eq!(buffer.pixel(4, 0), None);
        assert_eq!(buffer.into_raw(), vec![0; 36]);
    }
}
