//! Background themes keyed by weather condition category

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Theme {
    Cloud,
    Rain,
    Clear,
    Snow,
    Thunder,
    Mist,
    #[default]
    Default,
}

/// Match order matters: the first keyword found in the condition wins.
const KEYWORDS: [(&str, Theme); 6] = [
    ("cloud", Theme::Cloud),
    ("rain", Theme::Rain),
    ("clear", Theme::Clear),
    ("snow", Theme::Snow),
    ("thunder", Theme::Thunder),
    ("mist", Theme::Mist),
];

pub type Rgb = (u8, u8, u8);

impl Theme {
    pub fn from_condition(condition: &str) -> Self {
        let condition = condition.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(keyword, _)| condition.contains(keyword))
            .map_or(Theme::Default, |&(_, theme)| theme)
    }

    /// Left and right stops of the theme's horizontal gradient
    pub fn gradient(self) -> (Rgb, Rgb) {
        match self {
            Theme::Cloud => ((0x4b, 0x4b, 0x4b), (0x2e, 0x2e, 0x2e)),
            Theme::Rain => ((0x87, 0xce, 0xeb), (0x00, 0xbf, 0xff)),
            Theme::Clear => ((0xff, 0xfa, 0xcd), (0xc3, 0xe4, 0xf3)),
            Theme::Snow => ((0xf7, 0xf7, 0xf7), (0xe3, 0xe8, 0xe4)),
            Theme::Thunder => ((0xff, 0x8c, 0x00), (0xff, 0x45, 0x00)),
            Theme::Mist => ((0xbb, 0x44, 0x66), (0xaa, 0x4c, 0xc5)),
            Theme::Default => ((0x4f, 0xac, 0xfe), (0x00, 0xf2, 0xfe)),
        }
    }

    /// Single accent colour for borders and highlights
    pub fn accent(self) -> Rgb {
        self.gradient().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match() {
        assert_eq!(Theme::from_condition("light rain"), Theme::Rain);
        assert_eq!(Theme::from_condition("Clouds"), Theme::Cloud);
        assert_eq!(Theme::from_condition("Mist"), Theme::Mist);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(Theme::from_condition("Thunderstorm"), Theme::Thunder);
        assert_eq!(Theme::from_condition("SNOW"), Theme::Snow);
    }

    #[test]
    fn test_no_match_uses_default() {
        assert_eq!(Theme::from_condition("tornado"), Theme::Default);
        assert_eq!(Theme::from_condition(""), Theme::Default);
    }

    #[test]
    fn test_first_keyword_wins() {
        // "cloud" precedes "rain" in the match order
        assert_eq!(Theme::from_condition("rain clouds"), Theme::Cloud);
    }
}
