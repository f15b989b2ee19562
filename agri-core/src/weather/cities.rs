//! Bundled city data.

use crate::model::CityWeatherRecord;

/// Kharif season (June-September) averages for major Indian cities, in lookup order.
pub const CITY_WEATHER: &[(&str, CityWeatherRecord)] = &[
    ("Mumbai", CityWeatherRecord::new(28.5, 2200.0, 78.0)),
    ("Delhi", CityWeatherRecord::new(30.2, 700.0, 65.0)),
    ("Bangalore", CityWeatherRecord::new(24.8, 970.0, 72.0)),
    ("Hyderabad", CityWeatherRecord::new(27.5, 750.0, 68.0)),
    ("Ahmedabad", CityWeatherRecord::new(29.8, 800.0, 70.0)),
    ("Chennai", CityWeatherRecord::new(30.5, 1400.0, 75.0)),
    ("Kolkata", CityWeatherRecord::new(29.2, 1600.0, 80.0)),
    ("Pune", CityWeatherRecord::new(26.5, 1600.0, 70.0)),
    ("Jaipur", CityWeatherRecord::new(31.5, 650.0, 60.0)),
    ("Lucknow", CityWeatherRecord::new(30.8, 1000.0, 72.0)),
    ("Kanpur", CityWeatherRecord::new(31.2, 950.0, 68.0)),
    ("Nagpur", CityWeatherRecord::new(29.5, 1200.0, 70.0)),
    ("Indore", CityWeatherRecord::new(28.8, 1000.0, 68.0)),
    ("Bhopal", CityWeatherRecord::new(29.0, 1200.0, 70.0)),
    ("Visakhapatnam", CityWeatherRecord::new(29.5, 1000.0, 75.0)),
    ("Patna", CityWeatherRecord::new(30.5, 1100.0, 75.0)),
    ("Vadodara", CityWeatherRecord::new(29.5, 900.0, 72.0)),
    ("Coimbatore", CityWeatherRecord::new(26.5, 700.0, 70.0)),
    ("Vijayawada", CityWeatherRecord::new(30.0, 900.0, 72.0)),
    ("Jodhpur", CityWeatherRecord::new(32.5, 350.0, 55.0)),
    ("Madurai", CityWeatherRecord::new(30.0, 850.0, 70.0)),
    ("Raipur", CityWeatherRecord::new(29.8, 1300.0, 75.0)),
    ("Kota", CityWeatherRecord::new(31.0, 700.0, 65.0)),
    ("Guwahati", CityWeatherRecord::new(28.5, 1800.0, 80.0)),
    ("Chandigarh", CityWeatherRecord::new(29.5, 900.0, 68.0)),
    ("Mysore", CityWeatherRecord::new(25.5, 800.0, 72.0)),
    ("Bhubaneswar", CityWeatherRecord::new(29.8, 1500.0, 78.0)),
    ("Kochi", CityWeatherRecord::new(27.5, 3000.0, 85.0)),
    ("Dehradun", CityWeatherRecord::new(26.5, 2000.0, 75.0)),
    ("Gurgaon", CityWeatherRecord::new(30.5, 750.0, 65.0)),
    ("Noida", CityWeatherRecord::new(30.8, 750.0, 65.0)),
];

/// Average Indian conditions, used when nothing matches.
pub const DEFAULT_WEATHER: CityWeatherRecord = CityWeatherRecord::new(28.5, 1000.0, 70.0);

/// Names offered for autocomplete. Broader than [`CITY_WEATHER`] and never used to resolve weather.
pub const SUGGESTED_CITIES: &[&str] = &[
    "Mumbai", "Delhi", "Bangalore", "Hyderabad", "Ahmedabad", "Chennai", "Kolkata",
    "Pune", "Jaipur", "Lucknow", "Kanpur", "Nagpur", "Indore", "Bhopal", "Visakhapatnam",
    "Surat", "Thane", "Patna", "Vadodara", "Ghaziabad", "Ludhiana", "Agra", "Nashik",
    "Faridabad", "Meerut", "Rajkot", "Varanasi", "Srinagar", "Amritsar", "Aurangabad",
    "Dhanbad", "Noida", "Jabalpur", "Gwalior", "Coimbatore", "Vijayawada", "Jodhpur",
    "Madurai", "Raipur", "Kota", "Guwahati", "Chandigarh", "Solapur", "Hubli", "Mysore",
    "Tiruchirappalli", "Bareilly", "Aligarh", "Tiruppur", "Gurgaon", "Moradabad", "Jalandhar",
    "Bhubaneswar", "Salem", "Warangal", "Guntur", "Bhiwandi", "Saharanpur", "Gorakhpur",
    "Bikaner", "Amravati", "Jamshedpur", "Bhilai", "Cuttack", "Firozabad", "Kochi", "Nellore",
    "Bhavnagar", "Dehradun", "Durgapur", "Asansol", "Rourkela", "Nanded", "Kolhapur", "Ajmer",
    "Akola", "Gulbarga", "Jamnagar", "Udaipur", "Loni", "Jhansi", "Ulhasnagar", "Jammu",
    "Sangli", "Belgaum", "Mangalore", "Ambattur", "Teni", "Malegaon", "Gaya", "Jalgaon",
    "Ujjain", "Maheshtala", "Davanagere", "Kozhikode", "Kurnool", "Rajahmundry", "Bokaro",
    "South Dumdum", "Bellary", "Patiala", "Gopalpur", "Agartala", "Bhagalpur", "Muzaffarnagar",
    "Bhatpara", "Panihati", "Latur", "Dhule", "Rohtak", "Korba", "Bhilwara", "Brahmapur",
    "Muzaffarpur", "Ahmednagar", "Mathura", "Kollam", "Avadi", "Kadapa", "Kamareddy",
    "Sangareddy", "Suryapet", "Karimnagar", "Nizamabad", "Adilabad", "Mancherial", "Ramagundam",
    "Khammam", "Mahbubnagar", "Nalgonda", "Miryalaguda", "Siddipet", "Jagtial", "Peddapalli",
    "Nirmal", "Bhongir", "Medak", "Zaheerabad",
];

/// Default number of suggestions returned.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Case-insensitive substring filter over [`SUGGESTED_CITIES`], in list order.
pub fn suggest(query: &str, limit: usize) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    SUGGESTED_CITIES
        .iter()
        .filter(|city| city.to_lowercase().contains(&needle))
        .take(limit)
        .map(|city| (*city).to_string())
        .collect()
}
