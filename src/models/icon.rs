use serde::{Deserialize, Serialize};

pub const FALLBACK_ICON_NAME: &str = "FaCar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconLibrary {
    #[default]
    Fa,
    Md,
    Io,
    Bi,
    Hi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconEntry {
    pub library: IconLibrary,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IconCategory {
    pub name: &'static str,
    pub icons: &'static [IconEntry],
}

const fn fa(name: &'static str) -> IconEntry {
    IconEntry {
        library: IconLibrary::Fa,
        name,
    }
}

pub static FALLBACK_ICON: IconEntry = fa(FALLBACK_ICON_NAME);

pub static CATALOG: &[IconCategory] = &[
    IconCategory {
        name: "Health",
        icons: &[
            fa("FaHeartbeat"),
            fa("FaTooth"),
            fa("FaEye"),
            fa("FaStethoscope"),
            fa("FaPills"),
            fa("FaSyringe"),
            fa("FaThermometerHalf"),
            fa("FaBrain"),
        ],
    },
    IconCategory {
        name: "Fitness",
        icons: &[
            fa("FaDumbbell"),
            fa("FaRunning"),
            fa("FaBiking"),
            fa("FaSwimmer"),
            fa("FaWalking"),
            fa("FaLeaf"),
            fa("FaHiking"),
        ],
    },
    IconCategory {
        name: "Self Care",
        icons: &[
            fa("FaCut"),
            fa("FaSprayCan"),
            fa("FaHandPaper"),
            fa("FaPaintBrush"),
            fa("FaSoap"),
            fa("FaBath"),
        ],
    },
    IconCategory {
        name: "Household",
        icons: &[
            fa("FaBroom"),
            fa("FaSnowflake"),
            fa("FaBed"),
            fa("FaTshirt"),
            fa("FaTrash"),
            fa("FaCouch"),
            fa("FaHome"),
            fa("FaWrench"),
        ],
    },
    IconCategory {
        name: "Work/Study",
        icons: &[
            fa("FaLaptop"),
            fa("FaBook"),
            fa("FaPen"),
            fa("FaClipboard"),
            fa("FaCalendar"),
            fa("FaBriefcase"),
        ],
    },
    IconCategory {
        name: "Social",
        icons: &[
            fa("FaUsers"),
            fa("FaPhone"),
            fa("FaGift"),
            fa("FaHeart"),
            fa("FaComments"),
        ],
    },
];

pub fn all_icons() -> impl Iterator<Item = &'static IconEntry> {
    CATALOG.iter().flat_map(|category| category.icons.iter())
}

/// Resolves a stored library/name pair against the catalog, falling back to
/// the car icon for anything the catalog doesn't know.
pub fn resolve(library: IconLibrary, name: &str) -> &'static IconEntry {
    all_icons()
        .find(|icon| icon.library == library && icon.name == name)
        .unwrap_or(&FALLBACK_ICON)
}

pub fn random_icon<R: rand::Rng + ?Sized>(rng: &mut R) -> &'static IconEntry {
    use rand::seq::IteratorRandom;
    all_icons().choose(rng).unwrap_or(&FALLBACK_ICON)
}
