pub mod params;
pub mod zq;
pub mod error;
pub mod polynomial;
pub mod pt_ntt;
pub mod sampling;
pub mod hashing;
