//! Historical period tables.
//!
//! Every year-dependent lookup lives here so the generator and the
//! enrichment pipeline agree on bracket boundaries. Brackets are half-open
//! on the upper side: a year belongs to the first bracket whose bound it is
//! strictly below.

use crate::MediaEntry;

// ============================================================================
// FACTIONS AND OUTCOMES
// ============================================================================

/// Factions and outcome phrases plausible for a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodDetails {
    pub factions: &'static [&'static str],
    pub outcomes: &'static [&'static str],
}

const PERIOD_DETAILS: [(i32, PeriodDetails); 8] = [
    (
        0,
        PeriodDetails {
            factions: &[
                "Tribus Gauloises",
                "République Romaine",
                "Tribus Germaniques",
                "Tribus Celtes",
            ],
            outcomes: &[
                "Victoire des Gaulois",
                "Victoire Romaine",
                "Retraite stratégique",
                "Issue indécise",
            ],
        },
    ),
    (
        500,
        PeriodDetails {
            factions: &[
                "Empire Romain",
                "Royaumes Francs",
                "Wisigoths",
                "Burgondes",
                "Armée des Huns",
            ],
            outcomes: &[
                "Victoire Romaine",
                "Victoire des Francs",
                "Victoire des Wisigoths",
                "Conquête territoriale",
            ],
        },
    ),
    (
        1000,
        PeriodDetails {
            factions: &[
                "Royaume des Francs",
                "Raiders Vikings",
                "Forces Carolingiennes",
                "Duché de Bretagne",
            ],
            outcomes: &[
                "Victoire des Francs",
                "Victoire Viking",
                "Victoire Carolingienne",
                "Paix négociée",
            ],
        },
    ),
    (
        1300,
        PeriodDetails {
            factions: &[
                "Royaume de France",
                "Saint-Empire Romain",
                "Royaume d'Angleterre",
                "Duché de Normandie",
            ],
            outcomes: &[
                "Victoire Française",
                "Victoire Impériale",
                "Victoire Anglaise",
                "Trêve établie",
            ],
        },
    ),
    (
        1500,
        PeriodDetails {
            factions: &[
                "Royaume de France",
                "Royaume d'Angleterre",
                "Duché de Bourgogne",
                "Couronne d'Aragon",
            ],
            outcomes: &[
                "Victoire des Français",
                "Victoire des Anglais",
                "Victoire Bourguignonne",
                "Accord de paix",
            ],
        },
    ),
    (
        1700,
        PeriodDetails {
            factions: &[
                "Royaume de France",
                "Empire des Habsbourg",
                "Provinces-Unies",
                "États Protestants",
            ],
            outcomes: &[
                "Victoire Française",
                "Victoire des Habsbourg",
                "Victoire Protestante",
                "Compromis trouvé",
            ],
        },
    ),
    (
        1800,
        PeriodDetails {
            factions: &[
                "Royaume de France",
                "Coalition Européenne",
                "République Française",
                "Armée Révolutionnaire",
            ],
            outcomes: &[
                "Victoire Royaliste",
                "Victoire Républicaine",
                "Victoire de la Coalition",
                "Armistice signé",
            ],
        },
    ),
    (
        1900,
        PeriodDetails {
            factions: &[
                "Empire Français",
                "Royaume de Prusse",
                "Empire Russe",
                "Empire d'Autriche",
            ],
            outcomes: &[
                "Victoire Française",
                "Victoire Prussienne",
                "Victoire de la Coalition",
                "Traité de paix",
            ],
        },
    ),
];

const CONTEMPORARY_DETAILS: PeriodDetails = PeriodDetails {
    factions: &[
        "Armée Française",
        "Empire Allemand",
        "Forces Alliées",
        "Forces de l'Axe",
    ],
    outcomes: &[
        "Victoire Française",
        "Victoire Alliée",
        "Retraite ordonnée",
        "Position maintenue",
    ],
};

/// Factions and outcomes for the bracket containing `year`.
pub fn period_details(year: i32) -> &'static PeriodDetails {
    PERIOD_DETAILS
        .iter()
        .find(|(bound, _)| year < *bound)
        .map(|(_, details)| details)
        .unwrap_or(&CONTEMPORARY_DETAILS)
}

// ============================================================================
// HISTORICAL CONTEXT
// ============================================================================

const PERIOD_CONTEXTS: [(i32, &str); 5] = [
    (
        0,
        "Cette bataille s'inscrit dans la période gauloise, marquée par les conflits entre tribus et l'expansion romaine.",
    ),
    (
        500,
        "Cette bataille a lieu durant l'Antiquité tardive, période de transition entre l'Empire romain et les royaumes francs.",
    ),
    (
        1000,
        "Cette bataille se déroule pendant le Haut Moyen Âge, époque marquée par l'émergence du royaume franc et les invasions vikings.",
    ),
    (
        1500,
        "Cette bataille s'inscrit dans le contexte du Moyen Âge central et tardif, période de structuration du royaume de France.",
    ),
    (
        1800,
        "Cette bataille se déroule sous l'Ancien Régime, période marquée par la centralisation du pouvoir royal et les conflits européens.",
    ),
];

const CONTEMPORARY_CONTEXT: &str =
    "Cette bataille appartient à l'époque contemporaine, caractérisée par les guerres nationales et les conflits mondiaux.";

/// Canned French paragraph describing the period of `year`.
pub fn period_context(year: i32) -> &'static str {
    PERIOD_CONTEXTS
        .iter()
        .find(|(bound, _)| year < *bound)
        .map(|(_, text)| *text)
        .unwrap_or(CONTEMPORARY_CONTEXT)
}

// ============================================================================
// MEDIA
// ============================================================================

/// Coarse era used to pick sample illustrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaEra {
    Antiquity,
    EarlyMiddleAges,
    LateMiddleAges,
    Modern,
}

impl MediaEra {
    pub fn of_year(year: i32) -> Self {
        match year {
            y if y < 500 => MediaEra::Antiquity,
            y if y < 1000 => MediaEra::EarlyMiddleAges,
            y if y < 1500 => MediaEra::LateMiddleAges,
            _ => MediaEra::Modern,
        }
    }

    /// Representative illustration for `image_url`.
    pub fn image_url(&self) -> &'static str {
        match self {
            MediaEra::Antiquity => {
                "https://upload.wikimedia.org/wikipedia/commons/3/3f/Alesia-Vercingetorix.jpg"
            }
            MediaEra::EarlyMiddleAges => {
                "https://upload.wikimedia.org/wikipedia/commons/7/72/Bataille_Tours_732.jpg"
            }
            MediaEra::LateMiddleAges => {
                "https://upload.wikimedia.org/wikipedia/commons/9/9f/Siege_of_Orleans.jpg"
            }
            MediaEra::Modern => {
                "https://upload.wikimedia.org/wikipedia/commons/9/99/Napoleon_Bonaparte_battle.jpg"
            }
        }
    }

    /// Illustration listed in `media_urls`.
    pub fn media_url(&self) -> &'static str {
        match self {
            MediaEra::Antiquity => {
                "https://upload.wikimedia.org/wikipedia/commons/4/4a/Vercingetorix_jette_ses_armes_aux_pieds_de_Jules_César.jpg"
            }
            MediaEra::EarlyMiddleAges => {
                "https://upload.wikimedia.org/wikipedia/commons/f/f3/Charles_de_Steuben_-_Bataille_de_Poitiers.png"
            }
            MediaEra::LateMiddleAges => {
                "https://upload.wikimedia.org/wikipedia/commons/5/5f/Jeanne_d%27Arc_Orlèans.jpg"
            }
            MediaEra::Modern => {
                "https://upload.wikimedia.org/wikipedia/commons/1/15/Napoleon_at_the_Battle_of_Austerlitz.jpg"
            }
        }
    }
}

pub fn sample_image_url(year: i32) -> &'static str {
    MediaEra::of_year(year).image_url()
}

/// Single-entry media list for the era of `year`.
pub fn sample_media(year: i32) -> Vec<MediaEntry> {
    vec![MediaEntry::image(MediaEra::of_year(year).media_url())]
}

// ============================================================================
// SOURCE ARCHIVES
// ============================================================================

/// The period-specific archive linked after the generic sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodArchive {
    Inrap,
    Menestrel,
    HistoireDefense,
}

impl PeriodArchive {
    pub fn of_year(year: i32) -> Self {
        match year {
            y if y < 500 => PeriodArchive::Inrap,
            y if y < 1500 => PeriodArchive::Menestrel,
            _ => PeriodArchive::HistoireDefense,
        }
    }

    /// Key under which the link is stored in `sources`.
    pub fn name(&self) -> &'static str {
        match self {
            PeriodArchive::Inrap => "inrap",
            PeriodArchive::Menestrel => "menestrel",
            PeriodArchive::HistoireDefense => "histoire_defense",
        }
    }

    /// Search URL; the encoded query is appended directly.
    pub fn search_prefix(&self) -> &'static str {
        match self {
            PeriodArchive::Inrap => "https://www.inrap.fr/recherche?q=",
            PeriodArchive::Menestrel => "http://www.menestrel.fr/spip.php?recherche=",
            PeriodArchive::HistoireDefense => {
                "https://www.servicehistorique.sga.defense.gouv.fr/?q="
            }
        }
    }
}

/// Period keyword appended to Persée queries.
pub fn persee_period_keyword(year: i32) -> &'static str {
    match year {
        y if y < 500 => "antiquite",
        y if y < 1500 => "medieval",
        _ => "moderne",
    }
}

// ============================================================================
// GENERATION PERIODS
// ============================================================================

/// A year range and the number of battles generated inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationPeriod {
    /// Inclusive
    pub start_year: i32,
    /// Inclusive
    pub end_year: i32,
    pub count: u64,
    pub label: &'static str,
}

impl GenerationPeriod {
    pub fn contains(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }
}

pub const GENERATION_PERIODS: [GenerationPeriod; 4] = [
    GenerationPeriod {
        start_year: -100,
        end_year: 0,
        count: 600,
        label: "Antiquité",
    },
    GenerationPeriod {
        start_year: 1,
        end_year: 1789,
        count: 6900,
        label: "Moyen-Âge à Époque Moderne",
    },
    GenerationPeriod {
        start_year: 1789,
        end_year: 1815,
        count: 3000,
        label: "Période Révolutionnaire",
    },
    GenerationPeriod {
        start_year: 1815,
        end_year: 1945,
        count: 4500,
        label: "Époque Contemporaine",
    },
];

pub const TOTAL_GENERATED_BATTLES: u64 = 15_000;
