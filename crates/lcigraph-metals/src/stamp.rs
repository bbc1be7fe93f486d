//! Audit stamp left in the comment of every metal exchange touched

use std::fmt;

/// `old;new;technology;metal`: the embodied amount netted out, the new
/// intensity after unit conversion, and the DLR keys it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct MetalStamp {
    pub old: f64,
    pub new: f64,
    pub technology: String,
    pub metal: String,
}

impl MetalStamp {
    /// Parse a comment holding exactly four `;`-separated parts.
    pub fn parse(comment: &str) -> Option<Self> {
        let parts: Vec<&str> = comment.split(';').collect();
        let [old, new, technology, metal] = parts.as_slice() else {
            return None;
        };
        Some(Self {
            old: old.trim().parse().ok()?,
            new: new.trim().parse().ok()?,
            technology: technology.to_string(),
            metal: metal.to_string(),
        })
    }
}

impl fmt::Display for MetalStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{};{}", self.old, self.new, self.technology, self.metal)
    }
}
