use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOption {
    pub id: ClientId,
    pub name: String,
}

impl ClientOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ClientId::new(id),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown market '{0}'")]
pub struct UnknownMarket(pub String);

macro_rules! market_catalog {
    ($($variant:ident => $label:literal),+ $(,)?) => {
        /// Newsletter market a piece of copy can run in.
        ///
        /// The catalog is closed; declaration order is the display and payload order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Market {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl Market {
            pub const ALL: &'static [Market] = &[$(Market::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Market::$variant => $label,)+
                }
            }
        }

        impl FromStr for Market {
            type Err = UnknownMarket;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw {
                    $($label => Ok(Market::$variant),)+
                    other => Err(UnknownMarket(other.to_string())),
                }
            }
        }
    };
}

market_catalog! {
    Greenville => "GVLtoday",
    Charleston => "CHStoday",
    Columbia => "COLAtoday",
    Chattanooga => "NOOGAtoday",
    Austin => "ATXtoday",
    Dallas => "DALtoday",
    SanAntonio => "SATXtoday",
    KansasCity => "KCtoday",
    Seattle => "SEAtoday",
    Portland => "PDXtoday",
    Madison => "608today",
    Boston => "BOStoday",
    Columbus => "CBUStoday",
    SanJose => "SJtoday",
    Sacramento => "SACtoday",
    SanDiego => "SDtoday",
    Knoxville => "865today",
    Orlando => "ORLtoday",
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
