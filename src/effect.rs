//! Effects - side effects declared by the reducer

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Query current weather for a validated city name
    FetchWeather { city: String, seq: u64 },
}
