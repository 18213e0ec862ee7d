/// Shelf allocator for a square glyph atlas.
///
/// Glyphs are placed left to right on the current shelf; when one does not
/// fit horizontally a new shelf starts below the tallest glyph of the
/// previous one. Once a glyph does not fit vertically the packer reports
/// full and refuses every further allocation until [`ShelfPacker::reset`].
#[derive(Debug, Clone)]
pub struct ShelfPacker {
    size: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    pub fn new(size: u32, padding: u32) -> Self {
        Self {
            size,
            padding,
            cursor_x: padding,
            cursor_y: padding,
            row_height: 0,
            full: false,
        }
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Reserves a `w` x `h` cell and returns its top-left corner.
    pub fn allocate(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full {
            return None;
        }

        if self.cursor_x + w + self.padding > self.size {
            self.cursor_y += self.row_height + self.padding;
            self.cursor_x = self.padding;
            self.row_height = 0;
        }

        if self.cursor_x + w + self.padding > self.size
            || self.cursor_y + h + self.padding > self.size
        {
            self.full = true;
            return None;
        }

        let pos = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + self.padding;
        self.row_height = self.row_height.max(h);
        Some(pos)
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.size, self.padding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_shelf_left_to_right() {
        let mut p = ShelfPacker::new(64, 1);
        assert_eq!(p.allocate(10, 12), Some((1, 1)));
        assert_eq!(p.allocate(10, 8), Some((12, 1)));
    }

    #[test]
    fn wraps_below_tallest_glyph() {
        let mut p = ShelfPacker::new(32, 1);
        assert_eq!(p.allocate(20, 5), Some((1, 1)));
        assert_eq!(p.allocate(4, 9), Some((22, 1)));
        // 27 + 10 + 1 > 32 → next shelf at 1 + 9 + 1.
        assert_eq!(p.allocate(10, 3), Some((1, 11)));
    }

    #[test]
    fn reports_full_and_stays_full() {
        let mut p = ShelfPacker::new(16, 0);
        assert_eq!(p.allocate(16, 16), Some((0, 0)));
        assert_eq!(p.allocate(1, 1), None);
        assert!(p.is_full());
        assert_eq!(p.allocate(1, 1), None);

        p.reset();
        assert!(!p.is_full());
        assert_eq!(p.allocate(1, 1), Some((0, 0)));
    }

    #[test]
    fn rejects_glyph_wider_than_atlas() {
        let mut p = ShelfPacker::new(16, 1);
        assert_eq!(p.allocate(40, 2), None);
        assert!(p.is_full());
    }
}
