use super::DrawCmd;

/// Recorded draw stream for a frame.
///
/// Immediate-mode callers rely on painter's order, so there is no sorting:
/// commands are replayed exactly in the order they were pushed.
///
/// `clear()` keeps the allocation, so a warmed list does not allocate per frame.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    items: Vec<DrawCmd>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded commands. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.items.push(cmd);
    }

    /// Commands in paint order.
    #[inline]
    pub fn items(&self) -> &[DrawCmd] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Rect, Vec2};
    use crate::paint::Color;

    #[test]
    fn preserves_insertion_order() {
        let mut list = DrawList::new();
        list.push_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::RED);
        list.push_line(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), 1.0, Color::GREEN);
        list.push_rect(Rect::new(1.0, 1.0, 2.0, 2.0), Color::BLUE);

        let kinds: Vec<_> = list
            .items()
            .iter()
            .map(|c| match c {
                DrawCmd::Rect(r) => ("rect", r.color),
                DrawCmd::Line(l) => ("line", l.color),
                DrawCmd::Text(t) => ("text", t.color),
                DrawCmd::Texture(t) => ("texture", t.tint),
            })
            .collect();

        assert_eq!(
            kinds,
            vec![("rect", Color::RED), ("line", Color::GREEN), ("rect", Color::BLUE)]
        );
    }

    #[test]
    fn clear_empties_the_list() {
        let mut list = DrawList::new();
        list.push_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        list.clear();
        assert!(list.is_empty());
    }
}
