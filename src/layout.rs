//! Two-column masonry placement for pin cards

use crate::photos::PinImage;

/// Pins split across two columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Masonry {
    pub left: Vec<PinImage>,
    pub right: Vec<PinImage>,
}

impl Masonry {
    /// Place each pin in whichever column is currently shorter.
    ///
    /// Heights are measured at unit column width, so only aspect ratios
    /// matter. Ties go to the left column.
    pub fn build(pins: &[PinImage]) -> Self {
        let mut masonry = Masonry::default();
        let (mut left_height, mut right_height) = (0.0_f64, 0.0_f64);

        for pin in pins {
            if left_height <= right_height {
                left_height += pin.aspect_ratio();
                masonry.left.push(pin.clone());
            } else {
                right_height += pin.aspect_ratio();
                masonry.right.push(pin.clone());
            }
        }

        masonry
    }

    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(id: &str, width: u32, height: u32) -> PinImage {
        PinImage {
            id: id.to_string(),
            url: format!("https://images.example/{}", id),
            title: id.to_string(),
            description: None,
            width,
            height,
            dominant_color: None,
            user: None,
            likes: 0,
        }
    }

    #[test]
    fn tall_image_pushes_next_pins_right() {
        let pins = vec![
            pin("tall", 100, 300),
            pin("a", 100, 100),
            pin("b", 100, 100),
            pin("c", 100, 100),
        ];
        let masonry = Masonry::build(&pins);
        let left: Vec<_> = masonry.left.iter().map(|p| p.id.as_str()).collect();
        let right: Vec<_> = masonry.right.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(left, vec!["tall"]);
        assert_eq!(right, vec!["a", "b", "c"]);
    }

    #[test]
    fn missing_dimensions_use_placeholder_height() {
        let pins = vec![pin("x", 0, 0), pin("y", 100, 100), pin("z", 100, 100)];
        let masonry = Masonry::build(&pins);
        assert_eq!(masonry.left.len(), 1);
        assert_eq!(masonry.right.len(), 2);
        assert_eq!(masonry.len(), 3);
    }
}
