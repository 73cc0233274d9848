/// Maximum title length shown on the band axis before truncation.
pub const MAX_LABEL_CHARS: usize = 35;

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];
const SI_SIGNIFICANT_DIGITS: i32 = 6;

/// Round tick values covering `[start, stop]` with roughly `count` steps.
///
/// Steps are `1`, `2` or `5` times a power of ten. Returns an empty list
/// for non-finite input or a zero count.
#[must_use]
pub fn linear_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() || count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let (low, high, reversed) = if stop < start {
        (stop, start, true)
    } else {
        (start, stop, false)
    };

    let raw_step = (high - low) / count as f64;
    let power = raw_step.log10().floor();
    let error = raw_step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    let mut ticks = Vec::new();
    if power < 0.0 {
        // Work with the inverse increment to keep decimals exact.
        let inverse = 10f64.powf(-power) / factor;
        let mut first = (low * inverse).round();
        let mut last = (high * inverse).round();
        if first / inverse < low {
            first += 1.0;
        }
        if last / inverse > high {
            last -= 1.0;
        }
        let mut index = first;
        while index <= last {
            ticks.push(index / inverse);
            index += 1.0;
        }
    } else {
        let increment = 10f64.powf(power) * factor;
        let mut first = (low / increment).round();
        let mut last = (high / increment).round();
        if first * increment < low {
            first += 1.0;
        }
        if last * increment > high {
            last -= 1.0;
        }
        let mut index = first;
        while index <= last {
            ticks.push(index * increment);
            index += 1.0;
        }
    }

    if reversed {
        ticks.reverse();
    }
    ticks
}

/// SI-prefixed label with six significant digits and trailing zeros trimmed.
#[must_use]
pub fn format_si(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_owned();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    let exponent = magnitude.log10().floor() as i32;
    let unit = 10f64.powi(exponent - (SI_SIGNIFICANT_DIGITS - 1));
    let rounded = (magnitude / unit).round() * unit;
    let exponent = rounded.log10().floor() as i32;

    let prefix_index = exponent.div_euclid(3).clamp(-8, 8);
    let coefficient = rounded / 10f64.powi(prefix_index * 3);
    let decimals = (SI_SIGNIFICANT_DIGITS - 1 - (exponent - prefix_index * 3)).max(0) as usize;
    let mut digits = format!("{coefficient:.decimals$}");
    if digits.contains('.') {
        let trimmed = digits.trim_end_matches('0').trim_end_matches('.').len();
        digits.truncate(trimmed);
    }

    format!(
        "{sign}{digits}{}",
        SI_PREFIXES[(prefix_index + 8) as usize]
    )
}

/// Money axis label: SI format with `mil`/`bil`/`tril` suffixes.
#[must_use]
pub fn format_money_tick(value: f64) -> String {
    format_si(value)
        .replace('M', " mil")
        .replace('G', " bil")
        .replace('T', " tril")
}

/// Shortens long titles to `MAX_LABEL_CHARS` characters plus an ellipsis.
#[must_use]
pub fn cut_text(text: &str) -> String {
    if text.chars().count() < MAX_LABEL_CHARS {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(MAX_LABEL_CHARS).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::{cut_text, format_money_tick, format_si, linear_ticks};

    #[test]
    fn ticks_use_one_two_five_steps() {
        assert_eq!(
            linear_ticks(0.0, 1_000_000.0, 5),
            vec![0.0, 200_000.0, 400_000.0, 600_000.0, 800_000.0, 1_000_000.0]
        );
        assert_eq!(linear_ticks(0.0, 1.0, 4), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(linear_ticks(3.0, 3.0, 5), vec![3.0]);
    }

    #[test]
    fn si_format_trims_and_prefixes() {
        assert_eq!(format_si(0.0), "0");
        assert_eq!(format_si(1500.0), "1.5k");
        assert_eq!(format_si(250_000_000.0), "250M");
        assert_eq!(format_si(-2_000.0), "-2k");
        assert_eq!(format_si(21.946943), "21.9469");
    }

    #[test]
    fn money_ticks_spell_out_magnitudes() {
        assert_eq!(format_money_tick(1_000_000.0), "1 mil");
        assert_eq!(format_money_tick(3_000_000_000.0), "3 bil");
        assert_eq!(format_money_tick(1.2e12), "1.2 tril");
    }

    #[test]
    fn long_titles_are_cut() {
        assert_eq!(cut_text("Heat"), "Heat");
        let long = "A".repeat(40);
        assert_eq!(cut_text(&long), format!("{}...", "A".repeat(35)));
    }
}
