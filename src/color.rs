//! Linear RGB gradients for expression overlays.

use serde::Serialize;

pub type Rgb = (u8, u8, u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorGradient {
    pub start: Rgb,
    pub stop: Rgb,
    pub steps: usize,
}

impl ColorGradient {
    pub const DEFAULT_STEPS: usize = 100;

    pub fn new(start: Rgb, stop: Rgb, steps: usize) -> Self {
        Self { start, stop, steps }
    }

    /// `steps + 1` hex colors, starting at `start` and ending exactly at `stop`.
    pub fn get_list(&self) -> Vec<String> {
        let mut colors: Vec<Rgb> = (0..self.steps)
            .map(|index| intermediate(self.start, self.stop, index as f64 / self.steps as f64))
            .collect();
        colors.push(self.stop);
        colors.into_iter().map(to_hex).collect()
    }
}

impl Default for ColorGradient {
    fn default() -> Self {
        Self::new((0, 0, 0), (255, 255, 255), Self::DEFAULT_STEPS)
    }
}

/// `#rrggbb` in lowercase.
pub fn to_hex(color: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}

/// CSS functional notation, e.g. `rgb(0,0,255)`.
pub fn to_css(color: Rgb) -> String {
    format!("rgb({},{},{})", color.0, color.1, color.2)
}

// Components are truncated toward zero.
fn intermediate(start: Rgb, stop: Rgb, ratio: f64) -> Rgb {
    let mix = |from: u8, to: u8| (f64::from(to) * ratio + f64::from(from) * (1.0 - ratio)) as u8;
    (
        mix(start.0, stop.0),
        mix(start.1, stop.1),
        mix(start.2, stop.2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats() {
        assert_eq!(to_hex((0, 0, 255)), "#0000ff");
        assert_eq!(to_css((0, 0, 255)), "rgb(0,0,255)");
    }

    #[test]
    fn gradient_has_steps_plus_one_colors() {
        let gradient = ColorGradient::new((0, 0, 0), (255, 255, 255), 255);
        let colors = gradient.get_list();
        assert_eq!(colors.len(), 256);
        assert_eq!(colors[0], "#000000");
        assert_eq!(colors[123], to_hex((123, 123, 123)));
        assert_eq!(colors[255], "#ffffff");
    }

    #[test]
    fn zero_steps_yield_only_stop() {
        let gradient = ColorGradient::new((10, 20, 30), (40, 50, 60), 0);
        assert_eq!(gradient.get_list(), vec!["#28323c"]);
    }
}
