mod polyfit;
mod time_traveler;

pub use time_traveler::TimeTraveler;
