//! Climate module
//!
//! - Resolver: country/regional climate lookup, temperature banding, season lookup
//! - Detector: trip-level season and temperature detection across months and destinations

pub mod detector;
pub mod resolver;

pub use detector::{ClimateDetection, ClimateDetector, DetectedClimate, YearMonth, months_spanned};
pub use resolver::{
    ClimateCondition, ClimateProfile, ClimateTable, CountryClimate, DestinationResolution,
    Hemisphere, MonthlyClimate, RegionalClimate, ResolvedDestination, Season, SeasonMonths,
    TemperatureBand, seasons_for, temperature_bands_for,
};
