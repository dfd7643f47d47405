use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A position in SDK units (centimetres), with yaw in tenths of a degree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(default)]
    pub yaw: i32,
}

impl Coordinates {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Coordinates { x, y, z, yaw: 0 }
    }

    pub fn with_yaw(mut self, yaw: i32) -> Self {
        self.yaw = yaw;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected \"x,y,z\" or \"x,y,z,yaw\", got {0:?}")]
pub struct ParseCoordinatesError(String);

impl FromStr for Coordinates {
    type Err = ParseCoordinatesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ParseCoordinatesError(s.to_string()))?;

        match parts[..] {
            [x, y, z] => Ok(Coordinates::new(x, y, z)),
            [x, y, z, yaw] => Ok(Coordinates::new(x, y, z).with_yaw(yaw)),
            _ => Err(ParseCoordinatesError(s.to_string())),
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)?;
        if self.yaw != 0 {
            write!(f, ",{}", self.yaw)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_components() {
        let coords: Coordinates = "100, -50, 2000".parse().unwrap();
        assert_eq!(coords, Coordinates::new(100, -50, 2000));
    }

    #[test]
    fn test_parse_with_yaw() {
        let coords: Coordinates = "1,2,3,900".parse().unwrap();
        assert_eq!(coords.yaw, 900);
        assert_eq!(coords.to_string(), "1,2,3,900");
    }

    #[test]
    fn test_display_omits_zero_yaw() {
        let coords: Coordinates = "1,2,3".parse().unwrap();
        assert_eq!(coords.to_string(), "1,2,3");
        assert_eq!(Coordinates::new(-5, 0, 7).with_yaw(1800).to_string(), "-5,0,7,1800");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("1,2".parse::<Coordinates>().is_err());
        assert!("a,b,c".parse::<Coordinates>().is_err());
        assert!("1,2,3,4,5".parse::<Coordinates>().is_err());
        assert!("".parse::<Coordinates>().is_err());
    }
}
