//! Name and description synthesis.

use battlemap_core::BattleType;
use rand::seq::IndexedRandom;
use rand::Rng;

pub const LOCATIONS: [&str; 26] = [
    "Paris",
    "Lyon",
    "Marseille",
    "Bordeaux",
    "Toulouse",
    "Nice",
    "Nantes",
    "Strasbourg",
    "Montpellier",
    "Lille",
    "Rennes",
    "Reims",
    "Tours",
    "Caen",
    "Orléans",
    "Rouen",
    "Grenoble",
    "Dijon",
    "Amiens",
    "Nîmes",
    "Saint-Étienne",
    "Angers",
    "Villeurbanne",
    "Le Mans",
    "Clermont-Ferrand",
    "Aix-en-Provence",
];

pub const SUFFIXES: [&str; 10] = [
    "sur-Loire",
    "sur-Seine",
    "sur-Rhône",
    "sur-Garonne",
    "en-Provence",
    "le-Château",
    "la-Ville",
    "sur-Mer",
    "les-Bains",
    "le-Comte",
];

const ACTIONS: [&str; 5] = [
    "a lancé une offensive contre",
    "a défendu sa position contre",
    "a assiégé",
    "a tendu une embuscade à",
    "a affronté",
];

const RESULTS: [&str; 5] = [
    "entraînant de lourdes pertes dans les deux camps",
    "dans une bataille décisive",
    "changeant l'équilibre des forces",
    "marquant un tournant stratégique",
    "avec des conséquences majeures sur la suite du conflit",
];

const ELIDING_INITIALS: [char; 9] = ['a', 'e', 'i', 'o', 'u', 'é', 'è', 'ê', 'h'];

/// Probability that a name uses a real city rather than a derived one.
const REAL_CITY_PROBABILITY: f64 = 0.7;

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

/// `"d'"` before a vowel or mute h, `"de "` otherwise.
pub fn preposition(place: &str) -> &'static str {
    match place.to_lowercase().chars().next() {
        Some(c) if ELIDING_INITIALS.contains(&c) => "d'",
        _ => "de ",
    }
}

/// A real city, or a city with a hyphenated suffix.
pub fn place<R: Rng + ?Sized>(rng: &mut R) -> String {
    let city = pick(rng, &LOCATIONS);
    if rng.random_bool(REAL_CITY_PROBABILITY) {
        city.to_string()
    } else {
        format!("{}-{}", city, pick(rng, &SUFFIXES))
    }
}

/// `<Type> <preposition><Place>`.
pub fn battle_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let kind = BattleType::ALL
        .choose(rng)
        .copied()
        .unwrap_or(BattleType::Bataille);
    let place = place(rng);
    format!("{} {}{}", kind.label(), preposition(&place), place)
}

/// One sentence pitting the two factions against each other.
pub fn description<R: Rng + ?Sized>(rng: &mut R, attacker: &str, defender: &str) -> String {
    format!(
        "Les forces de {} {} {}, {}.",
        attacker,
        pick(rng, &ACTIONS),
        defender,
        pick(rng, &RESULTS)
    )
}
