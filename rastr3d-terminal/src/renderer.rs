/// Downsamples an RGB8 raster buffer into terminal characters
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use rastr3d_core::RasterBuffer;
use std::io::Write;

/// Character ramp by number of lit pixels in a cell (none to many)
const DENSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal-cell view of a raster buffer
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            char_buffer: vec![' '; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.char_buffer = vec![' '; width * height];
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
    }

    /// Map each terminal cell to the block of pixels it covers
    pub fn rasterize(&mut self, raster: &RasterBuffer) {
        self.clear();
        if self.width == 0 || self.height == 0 {
            return;
        }
        let (rw, rh) = (raster.width() as usize, raster.height() as usize);

        for row in 0..self.height {
            let (y0, y1) = span(row, self.height, rh);
            for col in 0..self.width {
                let (x0, x1) = span(col, self.width, rw);
                let lit = (y0..y1)
                    .flat_map(|y| (x0..x1).map(move |x| (x, y)))
                    .filter(|&(x, y)| {
                        raster
                            .pixel(x as u32, y as u32)
                            .is_some_and(|px| px != [0, 0, 0])
                    })
                    .count();
                self.char_buffer[row * self.width + col] =
                    DENSITY_RAMP[lit.min(DENSITY_RAMP.len() - 1)];
            }
        }
    }

    pub fn char_at(&self, col: usize, row: usize) -> Option<char> {
        (col < self.width && row < self.height).then(|| self.char_buffer[row * self.width + col])
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                // Color based on character density
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Pixel range `[start, end)` covered by cell `index` of `cells`
fn span(index: usize, cells: usize, pixels: usize) -> (usize, usize) {
    let start = index * pixels / cells;
    let end = ((index + 1) * pixels / cells).max(start + 1).min(pixels);
    (start, end)
}
