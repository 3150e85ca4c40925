//! Name reconciliation — static lookup tables, no algorithmic content.
//!
//! Two sources feed the planner and disagree on names: the official API uses
//! short web names that collide across players (two Martinezes, two Onanas),
//! and the forecast export arrives with broken Latin-1 transcoding. Both are
//! resolved here into one canonical spelling so rows can be joined by name.

use squadlab_core::domain::{PlayerId, Position};

/// Canonical name for an official-API player. Ids with ambiguous web names get
/// an explicit spelling; everyone else keeps the name the API sent.
pub fn canonical_api_name(id: PlayerId, raw: &str) -> String {
    let resolved = match id.0 {
        47 => "E. Martinez",
        380 => "L. Martinez",
        383 => "Andre Onana",
        233 => "Amadou Onana",
        447 => "C. Wood",
        477 => "N. Wood",
        491 => "Brennan Johnson",
        275 => "Ben Johnson",
        24 => "B. White",
        419 => "J. White",
        259 => "H. Wilson",
        421 => "C. Wilson",
        215 => "J. Ward",
        308 => "D. Ward",
        20 => "Partey",
        305 => "L. Thomas",
        73 => "N. Neto",
        560 => "P. Neto",
        397 => "R. Fraser",
        546 => "N. Fraser",
        _ => return raw.to_string(),
    };
    resolved.to_string()
}

/// Canonical name for a forecast row: first repair transcoding damage, then
/// disambiguate surnames that appear in more than one position.
pub fn canonical_forecast_name(raw: &str, position: Position) -> String {
    if let Some(repaired) = repair_encoding(raw) {
        return repaired.to_string();
    }
    if let Some(resolved) = disambiguate_by_position(raw, position) {
        return resolved.to_string();
    }
    raw.to_string()
}

/// The forecast export mangles non-ASCII names (U+FFFD where accents were).
fn repair_encoding(raw: &str) -> Option<&'static str> {
    Some(match raw {
        "\u{fffd}degaard" => "Ødegaard",
        "Luis D\u{fffd}az" => "Luis Díaz",
        "Jo\u{fffd}o Pedro" => "João Pedro",
        "S\u{fffd}nchez" => "Sánchez",
        "Gu\u{fffd}hi" => "Guéhi",
        "Mu\u{fffd}oz" => "Muñoz",
        "Ak\u{fffd}" => "Aké",
        "N\u{fffd}rgaard" => "Nørgaard",
        "Konat\u{fffd}" => "Konaté",
        "H\u{fffd}jlund" => "Højlund",
        "Sch\u{fffd}r" => "Schär",
        "Almir\u{fffd}n" => "Almirón",
        "J\u{fffd}rgensen" => "Jørgensen",
        "S\u{fffd}vio" => "Sávio",
        "\u{fffd}lvarez" => "Álvarez",
        _ => return None,
    })
}

/// Bare surnames shared across positions resolve by (name, position).
fn disambiguate_by_position(raw: &str, position: Position) -> Option<&'static str> {
    Some(match (raw, position) {
        ("Martinez", Position::Gkp) => "E. Martinez",
        ("Martinez", Position::Def) => "L. Martinez",
        ("Onana", Position::Gkp) => "Andre Onana",
        ("Onana", Position::Mid) => "Amadou Onana",
        ("Thomas", Position::Mid) => "Partey",
        ("Thomas", Position::Def) => "L. Thomas",
        ("Wood", Position::Fwd) => "C. Wood",
        ("Wood", Position::Def) => "N. Wood",
        ("Johnson", Position::Mid) => "Brennan Johnson",
        ("Johnson", Position::Def) => "Ben Johnson",
        ("White", Position::Def) => "B. White",
        ("White", Position::Mid) => "J. White",
        ("Wilson", Position::Fwd) => "C. Wilson",
        ("Wilson", Position::Mid) => "H. Wilson",
        ("Ward", Position::Def) => "J. Ward",
        ("Ward", Position::Gkp) => "D. Ward",
        ("Neto", Position::Gkp) => "N. Neto",
        ("Neto", Position::Mid) => "P. Neto",
        ("Fraser", Position::Mid) => "R. Fraser",
        ("Fraser", Position::Fwd) => "N. Fraser",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_ids_override_ambiguous_web_names() {
        assert_eq!(canonical_api_name(PlayerId(47), "Martinez"), "E. Martinez");
        assert_eq!(canonical_api_name(PlayerId(380), "Martinez"), "L. Martinez");
        assert_eq!(canonical_api_name(PlayerId(999), "Salah"), "Salah");
    }

    #[test]
    fn forecast_encoding_damage_is_repaired() {
        assert_eq!(canonical_forecast_name("\u{fffd}degaard", Position::Mid), "Ødegaard");
        assert_eq!(canonical_forecast_name("Luis D\u{fffd}az", Position::Mid), "Luis Díaz");
    }

    #[test]
    fn shared_surnames_resolve_by_position() {
        assert_eq!(canonical_forecast_name("Onana", Position::Gkp), "Andre Onana");
        assert_eq!(canonical_forecast_name("Onana", Position::Mid), "Amadou Onana");
        assert_eq!(canonical_forecast_name("Haaland", Position::Fwd), "Haaland");
    }
}
