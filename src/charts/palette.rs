//! Chart colours shared by the interactive and static backends (RGB).

pub const TEMPERATURE: (u8, u8, u8) = (231, 76, 60); // Red
pub const RAINFALL: (u8, u8, u8) = (52, 152, 219); // Blue
pub const RANGE: (u8, u8, u8) = (243, 156, 18); // Orange
pub const HUMIDITY: (u8, u8, u8) = (26, 188, 156); // Teal
pub const SUNSHINE: (u8, u8, u8) = (241, 196, 15); // Yellow
pub const WIND: (u8, u8, u8) = (96, 125, 139); // Blue Grey
pub const HISTOGRAM: (u8, u8, u8) = (135, 206, 235); // Sky blue
pub const TREND: (u8, u8, u8) = (220, 53, 69);
pub const WARM: (u8, u8, u8) = (180, 4, 38);
pub const COOL: (u8, u8, u8) = (59, 76, 192);
pub const NEUTRAL: (u8, u8, u8) = (221, 221, 221);
pub const MISSING: (u8, u8, u8) = (200, 200, 200);

/// Line/bar colour for a metric column.
pub fn series_color(column: &str) -> (u8, u8, u8) {
    match column {
        "Suhu" | "Anomali_Suhu" => TEMPERATURE,
        "Curah_Hujan" => RAINFALL,
        "Rentang_Suhu" => RANGE,
        "kelembaban" => HUMIDITY,
        "matahari" => SUNSHINE,
        "kecepatan_angin" => WIND,
        _ => RAINFALL,
    }
}

/// Diverging blue-white-red map for values in `[-1, 1]`.
pub fn coolwarm(value: f64) -> (u8, u8, u8) {
    if value.is_nan() {
        return MISSING;
    }
    let t = value.clamp(-1.0, 1.0);
    let (from, to, f) = if t < 0.0 {
        (NEUTRAL, COOL, -t)
    } else {
        (NEUTRAL, WARM, t)
    };
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
    (mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

/// Text colour that stays readable on top of `coolwarm(value)`.
pub fn contrast_text(value: f64) -> (u8, u8, u8) {
    if value.abs() > 0.6 {
        (255, 255, 255)
    } else {
        (0, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::{coolwarm, COOL, MISSING, NEUTRAL, WARM};

    #[test]
    fn test_coolwarm_endpoints() {
        assert_eq!(coolwarm(1.0), WARM);
        assert_eq!(coolwarm(-1.0), COOL);
        assert_eq!(coolwarm(0.0), NEUTRAL);
        assert_eq!(coolwarm(f64::NAN), MISSING);
        assert_eq!(coolwarm(3.0), WARM);
    }
}
