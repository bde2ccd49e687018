use std::convert::Infallible;
use std::fmt::Display;
use std::str::FromStr;

use bio::bio_types::strand::Strand as BioStrand;
use serde::{
    Deserialize,
    Serialize,
};

/// Strand of a feature. Annotations use `.` (here [`Strand::None`]) for
/// features without one.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord, Default)]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    None,
}

impl Strand {
    /// Integer encoding of gene tables: 1, -1 or 0.
    pub fn as_int(&self) -> i32 {
        match self {
            Strand::Forward => 1,
            Strand::Reverse => -1,
            Strand::None => 0,
        }
    }

    pub fn is_forward(&self) -> bool {
        matches!(self, Strand::Forward)
    }

    pub fn as_char(&self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::None => '.',
        }
    }
}

/// Accepts the GFF symbols and the Ensembl integer form; anything else is
/// [`Strand::None`].
impl FromStr for Strand {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "+" | "1" | "+1" => Strand::Forward,
            "-" | "-1" => Strand::Reverse,
            _ => Strand::None,
        })
    }
}

impl From<char> for Strand {
    fn from(value: char) -> Self {
        match value {
            '+' => Strand::Forward,
            '-' => Strand::Reverse,
            _ => Strand::None,
        }
    }
}

impl From<Strand> for char {
    fn from(value: Strand) -> Self {
        value.as_char()
    }
}

impl From<Strand> for BioStrand {
    fn from(value: Strand) -> Self {
        match value {
            Strand::Forward => BioStrand::Forward,
            Strand::Reverse => BioStrand::Reverse,
            Strand::None => BioStrand::Unknown,
        }
    }
}

impl From<BioStrand> for Strand {
    fn from(value: BioStrand) -> Self {
        match value {
            BioStrand::Forward => Strand::Forward,
            BioStrand::Reverse => Strand::Reverse,
            BioStrand::Unknown => Strand::None,
        }
    }
}

impl Display for Strand {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for Strand {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_char(self.as_char())
    }
}

impl<'de> Deserialize<'de> for Strand {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let symbol = String::deserialize(deserializer)?;
        Ok(symbol.parse().unwrap_or_default())
    }
}
