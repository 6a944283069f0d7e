/// Listing catalog
///
/// Read-only reference data: the property records bookings are made
/// against. Seeded in code; immutable for the life of the process.
use serde::{Deserialize, Serialize};

/// Contact details for a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingContact {
    pub phone: String,
    pub email: String,
}

/// A property record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    /// Rate-table key, e.g. "Student Hostel" or "Hotel"
    pub category: String,
    pub location: String,
    pub distance: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    /// Floor area in square metres
    pub size_sqm: u32,
    pub nightly_rate: i64,
    pub monthly_rate: i64,
    pub rating: f32,
    pub amenities: Vec<String>,
    pub available: bool,
    pub images: Vec<String>,
    pub contact: ListingContact,
}

/// The catalog of all listings
#[derive(Debug, Clone)]
pub struct Catalog {
    listings: Vec<Listing>,
}

impl Catalog {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    /// Catalog seeded with the built-in property records
    pub fn seeded() -> Self {
        Self::new(seed_listings())
    }

    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    pub fn all(&self) -> &[Listing] {
        &self.listings
    }

    pub fn by_category(&self, category: &str) -> Vec<&Listing> {
        self.listings
            .iter()
            .filter(|l| l.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}

fn listing(
    id: &str,
    title: &str,
    category: &str,
    location: &str,
    distance: &str,
    bedrooms: u32,
    bathrooms: u32,
    size_sqm: u32,
    nightly_rate: i64,
    monthly_rate: i64,
    rating: f32,
    amenities: &[&str],
    images: &[&str],
    phone: &str,
) -> Listing {
    Listing {
        id: id.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        location: location.to_string(),
        distance: distance.to_string(),
        bedrooms,
        bathrooms,
        size_sqm,
        nightly_rate,
        monthly_rate,
        rating,
        amenities: amenities.iter().map(|a| a.to_string()).collect(),
        available: true,
        images: images.iter().map(|i| i.to_string()).collect(),
        contact: ListingContact {
            phone: phone.to_string(),
            email: format!("bookings@{}.example.com", id),
        },
    }
}

fn seed_listings() -> Vec<Listing> {
    vec![
        listing(
            "r-101",
            "KARJEL HOMES",
            "Student Hostel",
            "Sunyani Tonsoum Estate, Ghana",
            "5.5KM from UENR",
            1,
            1,
            18,
            32,
            950,
            4.5,
            &["Wi-Fi", "Study desk", "Shared kitchen", "24h security"],
            &["/images/karjel-1.jpg", "/images/karjel-2.jpg"],
            "+233 54 123 4567",
        ),
        listing(
            "r-102",
            "SUNRISE LODGE",
            "Budget Hostel",
            "Fiapre, Sunyani",
            "3.2KM from UENR",
            1,
            1,
            14,
            22,
            650,
            3.9,
            &["Wi-Fi", "Shared bathroom", "Laundry"],
            &["/images/sunrise-1.jpg"],
            "+233 20 555 0192",
        ),
        listing(
            "r-103",
            "PARENT ESTATE LIMITED",
            "Luxury Apartment",
            "Accra, Sunyani Notre Dame",
            "8.5KM from UENR",
            2,
            2,
            65,
            50,
            1500,
            4.8,
            &["Air conditioning", "Wi-Fi", "Parking", "Balcony", "Kitchen"],
            &["/images/parent-1.jpg", "/images/parent-2.jpg"],
            "+233 55 987 6543",
        ),
        listing(
            "r-104",
            "EUSBETT HOTEL",
            "Hotel",
            "Berekum road, Sunyani",
            "1.1KM from UENR",
            1,
            1,
            28,
            76,
            2280,
            4.6,
            &["Breakfast", "Pool", "Room service", "Air conditioning"],
            &["/images/eusbett-1.jpg", "/images/eusbett-2.jpg"],
            "+233 56 456 7890",
        ),
        listing(
            "r-105",
            "CAMPUS VIEW RESIDENCE",
            "Student Residence",
            "Nkwabeng, Sunyani",
            "2.0KM from UENR",
            1,
            1,
            20,
            40,
            1200,
            4.2,
            &["Wi-Fi", "Study room", "Cafeteria", "Security"],
            &["/images/campusview-1.jpg"],
            "+233 24 778 1034",
        ),
        listing(
            "r-106",
            "GREENFIELD HOSTEL",
            "Green Hostel",
            "Abesim, Sunyani",
            "6.8KM from UENR",
            1,
            1,
            16,
            37,
            1100,
            4.1,
            &["Solar power", "Garden", "Wi-Fi", "Borehole water"],
            &["/images/greenfield-1.jpg"],
            "+233 27 330 4455",
        ),
        listing(
            "r-107",
            "RIDGE STUDIO FLATS",
            "Studio Apartment",
            "Sunyani Ridge",
            "4.4KM from UENR",
            1,
            1,
            32,
            60,
            1800,
            4.4,
            &["Kitchenette", "Wi-Fi", "Parking", "Air conditioning"],
            &["/images/ridge-1.jpg"],
            "+233 50 661 2087",
        ),
        listing(
            "r-108",
            "BAAKONIABA SHARED HOUSE",
            "Shared House",
            "Baakoniaba, Sunyani",
            "7.3KM from UENR",
            3,
            2,
            90,
            27,
            800,
            3.8,
            &["Shared kitchen", "Garden", "Laundry"],
            &["/images/baakoniaba-1.jpg"],
            "+233 26 909 7712",
        ),
    ]
}
