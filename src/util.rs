use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn format_count(count: u64) -> String {
    const UNITS: [&str; 4] = ["", "K", "M", "B"];

    let mut value = count as f64;
    let mut unit = 0usize;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    if unit == 0 {
        count.to_string()
    } else {
        format!("{value:.2}{}", UNITS[unit])
    }
}

pub fn format_optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "n/a".to_owned(), |value| value.to_string())
}

/// Maps a key onto `0..slots` deterministically for the lifetime of the process.
pub fn stable_slot(key: &str, slots: usize) -> usize {
    if slots == 0 {
        return 0;
    }

    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() % slots as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_use_decimal_units() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(10_500), "10.50K");
        assert_eq!(format_count(1_900_000), "1.90M");
    }

    #[test]
    fn stable_slot_is_deterministic_and_bounded() {
        let first = stable_slot("Ecchi", 18);
        assert_eq!(first, stable_slot("Ecchi", 18));
        assert!(first < 18);
        assert_eq!(stable_slot("anything", 0), 0);
    }
}
