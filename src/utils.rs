use crate::color::Color;

/// Picks a whole-pixel x so a body of `radius` spawns fully inside a canvas of `width`.
/// On a canvas narrower than the body the left-most valid position is used.
pub fn random_spawn_x(rng: &mut fastrand::Rng, width: f32, radius: f32) -> f32 {
    let min = radius.ceil() as i64;
    let max = (width - radius).floor() as i64;
    if max <= min {
        return min as f32;
    }
    rng.i64(min..=max) as f32
}

/// Uniformly random palette entry, black for an empty palette.
pub fn random_color(rng: &mut fastrand::Rng, palette: &[Color]) -> Color {
    if palette.is_empty() {
        return Color::BLACK;
    }
    palette[rng.usize(..palette.len())]
}

/// Parses a velocity field's text. Anything that is not a finite number reads as zero.
pub fn parse_velocity_field(text: &str) -> f32 {
    match text.trim().parse::<f32>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
