//! Physical stall layout of the barn.
//!
//! Stalls are fixed at compile time. Occupancy records refer to them by
//! [`Stall::id`]; the pixel rectangles locate each stall on the barn image so
//! the overlay can place a clickable region over it.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// A rectangle in the natural pixel space of the barn image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// A rectangle expressed as percentages of the image, for CSS positioning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Returns `None` for a zero-sized image.
    pub fn to_percent(self, image: ImageSize) -> Option<PercentRect> {
        if image.width == 0 || image.height == 0 {
            return None;
        }
        let w = f64::from(image.width);
        let h = f64::from(image.height);
        Some(PercentRect {
            left: f64::from(self.x) / w * 100.0,
            top: f64::from(self.y) / h * 100.0,
            width: f64::from(self.w) / w * 100.0,
            height: f64::from(self.h) / h * 100.0,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stall {
    pub id: &'static str,
    pub number: u8,
    pub rect: PixelRect,
}

const fn stall(id: &'static str, number: u8, x: u32, y: u32, w: u32, h: u32) -> Stall {
    Stall {
        id,
        number,
        rect: PixelRect { x, y, w, h },
    }
}

pub static STALLS: [Stall; 18] = [
    stall("S01", 1, 874, 80, 113, 100),
    stall("S02", 2, 753, 80, 118, 100),
    stall("S03", 3, 495, 80, 133, 100),
    stall("S04", 4, 298, 82, 128, 98),
    stall("S05", 5, 43, 80, 128, 100),
    stall("S06", 6, 43, 257, 129, 106),
    stall("S07", 7, 172, 257, 142, 106),
    stall("S08", 8, 314, 259, 146, 104),
    stall("S09", 9, 460, 257, 138, 106),
    stall("S10", 10, 522, 364, 104, 117),
    stall("S11", 11, 538, 481, 117, 122),
    stall("S12", 12, 540, 603, 113, 122),
    stall("S13", 13, 540, 725, 113, 113),
    stall("S14", 14, 540, 838, 113, 67),
    stall("S15", 15, 753, 483, 129, 166),
    stall("S16", 16, 828, 364, 113, 115),
    stall("S17", 17, 753, 257, 120, 106),
    stall("S18", 18, 874, 259, 115, 104),
];

pub fn find_stall(id: &str) -> Option<&'static Stall> {
    let id = id.trim();
    STALLS.iter().find(|stall| stall.id.eq_ignore_ascii_case(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stall_ids_and_numbers_are_unique() {
        let mut ids: Vec<_> = STALLS.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), STALLS.len());

        for (index, stall) in STALLS.iter().enumerate() {
            assert_eq!(usize::from(stall.number), index + 1);
        }
    }

    #[test]
    fn percent_rect_scales_against_image() {
        let rect = PixelRect { x: 100, y: 50, w: 200, h: 25 };
        let pct = rect
            .to_percent(ImageSize { width: 1000, height: 500 })
            .expect("non-empty image");
        assert_eq!(pct.left, 10.0);
        assert_eq!(pct.top, 10.0);
        assert_eq!(pct.width, 20.0);
        assert_eq!(pct.height, 5.0);
    }

    #[test]
    fn percent_rect_requires_image_size() {
        let rect = STALLS[0].rect;
        assert!(rect.to_percent(ImageSize { width: 0, height: 10 }).is_none());
    }

    #[test]
    fn find_stall_is_case_insensitive() {
        assert_eq!(find_stall("s07").map(|s| s.number), Some(7));
        assert!(find_stall("S19").is_none());
    }
}
