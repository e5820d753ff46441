//! Trivia rules - named moons and text emoticons.
//!
//! Both are plain case-sensitive substring searches over a fixed list.

use super::RuleResult;
use crate::error::RuleViolation;
use secrecy::{ExposeSecret, SecretString};

/// Named planetary satellites accepted by [`contains_satellite`].
pub const SATELLITES: &[&str] = &[
    "Luna", "Deimos", "Phobos", "Amalthea", "Callisto", "Europa", "Ganymede", "Io", "Dione",
    "Enceladus", "Hyperion", "Iapetus", "Mimas", "Phoebe", "Rhea", "Tethys", "Titan", "Ariel",
    "Miranda", "Oberon", "Titania", "Umbriel", "Nereid", "Triton", "Charon", "Himalia", "Carme",
    "Ananke", "Adrastea", "Elara", "Epimetheus", "Callirrhoe", "Kalyke", "Thebe", "Methone",
    "Kiviuq", "Ijiraq", "Paaliaq", "Albiorix", "Erriapus", "Pallene", "Polydeuces", "Bestla",
    "Daphnis", "Despina", "Puck", "Carpo", "Pasiphae", "Themisto", "Cyllene", "Isonoe",
    "Harpalyke", "Hermippe", "Iocaste", "Chaldene", "Euporie",
];

/// Text emoticons accepted by [`contains_emoticon`].
///
/// Some entries use U+2011 (non-breaking hyphen) for the nose, as typed on
/// the reference emoticon charts; the ASCII hyphen forms are listed separately.
pub const EMOTICONS: &[&str] = &[
    // happy
    ":‑)", ":)", ":-]", ":]", ":>", ":->", ":-}", ":}", ":o))", ":o)", ":^)", "=]", "=)", "8-)",
    ":‑D", ":D", "B^D",
    // sad, angry
    ":‑(", ":(", ":‑<", ":<", ":‑[", ":[", ":-||", ">:[", ":{", ";(", ":=(",
    // crying, tears of joy
    ":'‑(", ":'(", ":'‑)", ":')", ":\"D",
    // surprise
    ":‑O", ":O", ":‑o", ":o", ":-0", ">:O",
    // wink, tongue
    ">:3", ";‑)", ";)", ";‑]", ";^)", ":‑P",
    // skeptical, straight face
    ":-/", ":/", ":‑.", ">:", ">:/", ":‑|", ":|",
    // evil
    ">:‑)", ">:)", "}:‑)", ">;‑)", ">;)", "|;‑)",
    // misc
    ":‑J", "<:‑|", "~:>",
];

fn contains_any(password: &SecretString, needles: &[&str]) -> bool {
    let pwd = password.expose_secret();
    needles.iter().any(|needle| pwd.contains(needle))
}

pub fn contains_satellite(password: &SecretString) -> RuleResult {
    if contains_any(password, SATELLITES) {
        return Ok(());
    }
    Err(RuleViolation::NoSatellite)
}

pub fn contains_emoticon(password: &SecretString) -> RuleResult {
    if contains_any(password, EMOTICONS) {
        return Ok(());
    }
    Err(RuleViolation::NoEmoticon)
}
