//! Veterinarian directory types.

use serde::{Deserialize, Serialize};

/// Query string for `GET /api/vets/list`.
///
/// - `city`: case-insensitive substring match
/// - `state`: exact match
/// - `rating`: minimum rating, must parse as a number
#[derive(Debug, Default, Deserialize)]
pub struct VetListQuery {
    pub city: Option<String>,
    pub state: Option<String>,
    pub rating: Option<String>,
}

/// A service offered by every clinic in the directory.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VetService {
    pub id: i32,
    pub name: &'static str,
    pub price: f64,
}

/// Services listed on every vet detail page.
pub const VET_SERVICES: [VetService; 5] = [
    VetService {
        id: 1,
        name: "General Check-up",
        price: 50.00,
    },
    VetService {
        id: 2,
        name: "Vaccination",
        price: 35.00,
    },
    VetService {
        id: 3,
        name: "Dental Cleaning",
        price: 80.00,
    },
    VetService {
        id: 4,
        name: "Microchipping",
        price: 45.00,
    },
    VetService {
        id: 5,
        name: "Spay/Neuter",
        price: 150.00,
    },
];
