use bushfire_risk_core::{classify_rating, compute_fdi, FireDangerRating};

/// Fire danger rating, ordered from least to most dangerous.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BushfireDangerRating {
    Low = 0,
    Moderate = 1,
    High = 2,
    VeryHigh = 3,
    Severe = 4,
    Extreme = 5,
    Catastrophic = 6,
}

impl From<FireDangerRating> for BushfireDangerRating {
    fn from(rating: FireDangerRating) -> Self {
        match rating {
            FireDangerRating::Low => BushfireDangerRating::Low,
            FireDangerRating::Moderate => BushfireDangerRating::Moderate,
            FireDangerRating::High => BushfireDangerRating::High,
            FireDangerRating::VeryHigh => BushfireDangerRating::VeryHigh,
            FireDangerRating::Severe => BushfireDangerRating::Severe,
            FireDangerRating::Extreme => BushfireDangerRating::Extreme,
            FireDangerRating::Catastrophic => BushfireDangerRating::Catastrophic,
        }
    }
}

/// `McArthur` Forest Fire Danger Index.
///
/// A drought factor of zero, negative or NaN is treated as 1; any positive
/// value is used as given.
#[no_mangle]
pub extern "C" fn bushfire_compute_fdi(
    temperature: f64,
    humidity: f64,
    wind_speed: f64,
    drought_factor: f64,
) -> f64 {
    compute_fdi(temperature, humidity, wind_speed, drought_factor)
}

/// Rating band for an index value.
#[no_mangle]
pub extern "C" fn bushfire_classify_rating(fdi: f64) -> BushfireDangerRating {
    classify_rating(fdi).into()
}
